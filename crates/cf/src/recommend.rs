//! Score prediction and top-N recommendation generation.
//!
//! Two orientations share the [`Recommender`] trait:
//!
//! - **User-based**: take the K users most similar to the target, gather the
//!   items they rated, and predict `score[i] = Σ sim(u, v) · r_vi` over the
//!   neighbors v that rated i.
//! - **Item-based**: for every item the target rated, take its K most
//!   similar items and predict `score[j] = Σ r_ui · sim(i, j)` over the
//!   rated items i.
//!
//! Both never propose an item the target already rated, return an empty
//! list for a cold-start target (absent from the similarity matrix or the
//! store), and treat `k == 0` / `n == 0` as valid degenerate calls that
//! yield an empty list.

use crate::similarity::SimilarityMatrix;
use ratings::{ItemId, RatingStore, UserId};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One ranked recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredItem {
    pub item_id: ItemId,
    pub score: f64,
}

/// Common interface for both recommendation orientations.
///
/// `Send + Sync` so the evaluator can fan recommendation calls out over a
/// rayon worker pool with shared read-only state.
pub trait Recommender: Send + Sync {
    /// Returns the name of this recommender (for logging/reports)
    fn name(&self) -> &str;

    /// Ranked recommendations for a user.
    ///
    /// # Arguments
    /// * `user_id` - The target user
    /// * `neighbor_count` - Size K of the similarity neighborhood
    /// * `result_count` - Number N of items returned
    ///
    /// Descending by predicted score, ties broken by ascending item id.
    fn recommend(
        &self,
        user_id: UserId,
        neighbor_count: usize,
        result_count: usize,
    ) -> Vec<ScoredItem>;
}

/// Rank accumulated scores: descending by score, ascending id on ties,
/// truncated to `result_count`
fn rank(scores: HashMap<ItemId, f64>, result_count: usize) -> Vec<ScoredItem> {
    let mut ranked: Vec<ScoredItem> = scores
        .into_iter()
        .map(|(item_id, score)| ScoredItem { item_id, score })
        .collect();

    ranked.sort_unstable_by(|a, b| b.score.total_cmp(&a.score).then(a.item_id.cmp(&b.item_id)));
    ranked.truncate(result_count);
    ranked
}

// =============================================================================
// User-based orientation
// =============================================================================

/// Recommends through similar users: "users like you also rated..."
pub struct UserBasedRecommender {
    /// Shared reference to the training data (read-only)
    train: Arc<RatingStore>,
    /// User-user similarity, built from the user orientation of the store
    similarity: SimilarityMatrix,
}

impl UserBasedRecommender {
    /// Create a recommender from an already-built user-user similarity
    /// matrix (for example one loaded from the cache)
    pub fn new(train: Arc<RatingStore>, similarity: SimilarityMatrix) -> Self {
        Self { train, similarity }
    }

    /// Build the user-user similarity matrix from the store and wrap it
    pub fn fit(train: Arc<RatingStore>, weighting: crate::Weighting) -> Self {
        let similarity = crate::similarity_matrix(train.by_user(), weighting);
        Self { train, similarity }
    }

    /// The underlying similarity matrix
    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }
}

impl Recommender for UserBasedRecommender {
    fn name(&self) -> &str {
        "UserBasedRecommender"
    }

    #[instrument(skip(self), fields(user_id = user_id))]
    fn recommend(
        &self,
        user_id: UserId,
        neighbor_count: usize,
        result_count: usize,
    ) -> Vec<ScoredItem> {
        if result_count == 0 {
            return Vec::new();
        }

        let seen = self.train.user_ratings(user_id);
        let neighbors = self.similarity.top_k(user_id, neighbor_count);
        debug!("Selected {} neighbors for user {}", neighbors.len(), user_id);

        let mut scores: HashMap<ItemId, f64> = HashMap::new();
        for (neighbor, similarity) in neighbors {
            let Some(rated) = self.train.user_ratings(neighbor) else {
                continue;
            };
            for (&item_id, &score) in rated {
                // Filter items the user interacted with before
                if seen.is_some_and(|s| s.contains_key(&item_id)) {
                    continue;
                }
                *scores.entry(item_id).or_insert(0.0) += similarity * score as f64;
            }
        }

        rank(scores, result_count)
    }
}

// =============================================================================
// Item-based orientation
// =============================================================================

/// Recommends through similar items: "because you rated this, you may like..."
pub struct ItemBasedRecommender {
    /// Shared reference to the training data (read-only)
    train: Arc<RatingStore>,
    /// Item-item similarity, built from the item orientation of the store
    similarity: SimilarityMatrix,
}

impl ItemBasedRecommender {
    /// Create a recommender from an already-built item-item similarity
    /// matrix (for example one loaded from the cache)
    pub fn new(train: Arc<RatingStore>, similarity: SimilarityMatrix) -> Self {
        Self { train, similarity }
    }

    /// Build the item-item similarity matrix from the store and wrap it
    pub fn fit(train: Arc<RatingStore>, weighting: crate::Weighting) -> Self {
        let similarity = crate::similarity_matrix(train.by_item(), weighting);
        Self { train, similarity }
    }

    /// The underlying similarity matrix
    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }
}

impl Recommender for ItemBasedRecommender {
    fn name(&self) -> &str {
        "ItemBasedRecommender"
    }

    #[instrument(skip(self), fields(user_id = user_id))]
    fn recommend(
        &self,
        user_id: UserId,
        neighbor_count: usize,
        result_count: usize,
    ) -> Vec<ScoredItem> {
        if result_count == 0 {
            return Vec::new();
        }

        let Some(rated) = self.train.user_ratings(user_id) else {
            // Cold start: user unknown to the training data
            return Vec::new();
        };

        let mut scores: HashMap<ItemId, f64> = HashMap::new();
        for (&item_id, &score) in rated {
            for (similar_item, similarity) in self.similarity.top_k(item_id, neighbor_count) {
                if rated.contains_key(&similar_item) {
                    continue;
                }
                *scores.entry(similar_item).or_insert(0.0) += score as f64 * similarity;
            }
        }

        debug!("Accumulated {} candidate items for user {}", scores.len(), user_id);
        rank(scores, result_count)
    }
}
