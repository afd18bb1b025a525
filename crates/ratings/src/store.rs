//! The in-memory rating store.
//!
//! This module holds the sparse user-item interaction data used by the
//! collaborative filtering core:
//! - user → (item → score), the primary orientation
//! - item → (user → score), the transpose, kept in sync on every insert
//!
//! Rust concepts demonstrated:
//! - Nested HashMaps as a sparse matrix
//! - Borrowing: accessors return references, the store keeps ownership
//! - Entry API for building indices

use crate::types::{ItemId, Rating, UserId};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Sparse store of user-item interactions.
///
/// Only strictly positive scores are stored: a zero score means "no observed
/// interaction" and inserting one is a no-op, so the invariant
/// "stored ⇔ score > 0" holds by construction. The store is built once per
/// run and then treated as read-only by every downstream component.
#[derive(Debug, Default)]
pub struct RatingStore {
    /// user → (item → score)
    by_user: HashMap<UserId, HashMap<ItemId, f32>>,
    /// item → (user → score), transpose of `by_user`
    by_item: HashMap<ItemId, HashMap<UserId, f32>>,
    /// Number of stored (positive) interactions
    rating_count: usize,
}

impl RatingStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an iterator of rating records.
    ///
    /// Non-positive records are dropped silently; they are valid input that
    /// simply carries no interaction signal.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = Rating>,
    {
        let mut store = Self::new();
        for rating in ratings {
            store.insert(rating);
        }
        store
    }

    /// Insert a single rating, updating both orientations.
    ///
    /// A duplicate (user, item) pair overwrites the previous score; the
    /// rating count tracks distinct pairs.
    pub fn insert(&mut self, rating: Rating) {
        if !rating.is_positive() {
            return;
        }

        let previous = self
            .by_user
            .entry(rating.user_id)
            .or_default()
            .insert(rating.item_id, rating.score);

        self.by_item
            .entry(rating.item_id)
            .or_default()
            .insert(rating.user_id, rating.score);

        if previous.is_none() {
            self.rating_count += 1;
        }
    }

    // Getters - these return references; the store keeps ownership

    /// All interactions in user → (item → score) orientation
    pub fn by_user(&self) -> &HashMap<UserId, HashMap<ItemId, f32>> {
        &self.by_user
    }

    /// All interactions in item → (user → score) orientation
    pub fn by_item(&self) -> &HashMap<ItemId, HashMap<UserId, f32>> {
        &self.by_item
    }

    /// All items rated by a user, or `None` for an unknown user
    pub fn user_ratings(&self, user_id: UserId) -> Option<&HashMap<ItemId, f32>> {
        self.by_user.get(&user_id)
    }

    /// All users that rated an item, or `None` for an unknown item
    pub fn item_ratings(&self, item_id: ItemId) -> Option<&HashMap<UserId, f32>> {
        self.by_item.get(&item_id)
    }

    /// Score of a single (user, item) pair, if observed
    pub fn score(&self, user_id: UserId, item_id: ItemId) -> Option<f32> {
        self.by_user.get(&user_id)?.get(&item_id).copied()
    }

    /// Number of distinct users with at least one interaction
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Number of distinct items with at least one interaction
    pub fn item_count(&self) -> usize {
        self.by_item.len()
    }

    /// Number of stored interactions
    pub fn rating_count(&self) -> usize {
        self.rating_count
    }

    /// True if the store holds no interactions
    pub fn is_empty(&self) -> bool {
        self.rating_count == 0
    }

    /// Deterministic content fingerprint, used to key the similarity cache.
    ///
    /// HashMap iteration order is unspecified, so the entries are hashed in
    /// sorted (user, item) order; float scores are hashed through their bit
    /// pattern. Equal stores always produce equal fingerprints across runs.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        let mut user_ids: Vec<UserId> = self.by_user.keys().copied().collect();
        user_ids.sort_unstable();

        for user_id in user_ids {
            user_id.hash(&mut hasher);

            let items = &self.by_user[&user_id];
            let mut item_ids: Vec<ItemId> = items.keys().copied().collect();
            item_ids.sort_unstable();

            for item_id in item_ids {
                item_id.hash(&mut hasher);
                items[&item_id].to_bits().hash(&mut hasher);
            }
        }

        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(user_id: UserId, item_id: ItemId, score: f32) -> Rating {
        Rating {
            user_id,
            item_id,
            score,
            timestamp: None,
        }
    }

    #[test]
    fn test_empty_store() {
        let store = RatingStore::new();
        assert!(store.is_empty());
        assert_eq!(store.user_count(), 0);
        assert_eq!(store.item_count(), 0);
        assert!(store.user_ratings(1).is_none());
    }

    #[test]
    fn test_zero_score_never_materialized() {
        let store = RatingStore::from_ratings([rating(1, 10, 0.0), rating(1, 11, 3.0)]);

        assert_eq!(store.rating_count(), 1);
        assert!(store.score(1, 10).is_none());
        assert_eq!(store.score(1, 11), Some(3.0));
    }

    #[test]
    fn test_transpose_stays_in_sync() {
        let store = RatingStore::from_ratings([
            rating(1, 10, 4.0),
            rating(2, 10, 5.0),
            rating(2, 11, 3.5),
        ]);

        assert_eq!(store.user_count(), 2);
        assert_eq!(store.item_count(), 2);

        let raters = store.item_ratings(10).unwrap();
        assert_eq!(raters.len(), 2);
        assert_eq!(raters[&1], 4.0);
        assert_eq!(raters[&2], 5.0);
    }

    #[test]
    fn test_duplicate_pair_overwrites() {
        let store = RatingStore::from_ratings([rating(1, 10, 2.0), rating(1, 10, 4.5)]);

        assert_eq!(store.rating_count(), 1);
        assert_eq!(store.score(1, 10), Some(4.5));
        assert_eq!(store.item_ratings(10).unwrap()[&1], 4.5);
    }

    #[test]
    fn test_fingerprint_is_order_independent() {
        let a = RatingStore::from_ratings([rating(1, 10, 4.0), rating(2, 11, 3.0)]);
        let b = RatingStore::from_ratings([rating(2, 11, 3.0), rating(1, 10, 4.0)]);

        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let a = RatingStore::from_ratings([rating(1, 10, 4.0)]);
        let b = RatingStore::from_ratings([rating(1, 10, 4.5)]);

        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
