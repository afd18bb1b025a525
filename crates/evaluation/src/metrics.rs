//! Offline evaluation of a recommender against a held-out test split.
//!
//! ## Metrics
//! - **Precision**: hits / (evaluated users × N) - how much of what was
//!   recommended actually shows up in the test split
//! - **Recall**: hits / total test interactions - how much of the test
//!   split the recommendations recover
//! - **Coverage**: distinct recommended items / distinct training items -
//!   the long-tail reach of the recommender
//! - **Popularity**: mean `ln(1 + training_popularity)` over every
//!   recommended item instance - lower values skew toward the long tail
//!
//! Every training user is evaluated with a fixed K and N. A user absent
//! from the test split contributes zero hits and nothing to the recall
//! denominator; that is an expected outcome, not a fault. A metric whose
//! denominator works out to zero is reported as `None` ("undefined")
//! rather than a silent 0 or an infinity.

use cf::{ConfigError, RecommendConfig, Recommender};
use ratings::{ItemId, RatingStore, UserId};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Aggregate metrics over one evaluation run.
///
/// `None` means the metric's denominator was zero and the value is
/// undefined for this split.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalReport {
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub coverage: Option<f64>,
    pub popularity: Option<f64>,
    /// Number of training users the recommender was invoked for
    pub users_evaluated: usize,
    /// Recommended items that appear in the user's test interactions
    pub hits: usize,
}

/// Per-worker accumulator, merged additively across the rayon pool
#[derive(Default)]
struct Accumulator {
    hits: usize,
    test_interactions: usize,
    recommended_instances: usize,
    popularity_sum: f64,
    recommended_items: HashSet<ItemId>,
}

impl Accumulator {
    fn merge(mut self, other: Accumulator) -> Accumulator {
        self.hits += other.hits;
        self.test_interactions += other.test_interactions;
        self.recommended_instances += other.recommended_instances;
        self.popularity_sum += other.popularity_sum;
        self.recommended_items.extend(other.recommended_items);
        self
    }
}

/// Drives a recommender over every training user and aggregates the four
/// offline metrics.
pub struct Evaluator<'a, R: Recommender> {
    recommender: &'a R,
    train: &'a RatingStore,
    test: &'a RatingStore,
}

impl<'a, R: Recommender> Evaluator<'a, R> {
    pub fn new(recommender: &'a R, train: &'a RatingStore, test: &'a RatingStore) -> Self {
        Self {
            recommender,
            train,
            test,
        }
    }

    /// Run the full evaluation pass.
    ///
    /// Per-user recommendation calls are independent and run on the rayon
    /// pool with read-only access to the stores and the similarity matrix.
    pub fn evaluate(&self, config: &RecommendConfig) -> Result<EvalReport, ConfigError> {
        config.validate()?;

        let user_ids: Vec<UserId> = self.train.by_user().keys().copied().collect();
        info!(
            "Evaluating {} over {} training users (K={}, N={})",
            self.recommender.name(),
            user_ids.len(),
            config.neighbor_count,
            config.result_count
        );

        let totals = user_ids
            .par_iter()
            .fold(Accumulator::default, |mut acc, &user_id| {
                self.evaluate_user(user_id, config, &mut acc);
                acc
            })
            .reduce(Accumulator::default, Accumulator::merge);

        debug!(
            "{} hits over {} recommended instances",
            totals.hits, totals.recommended_instances
        );

        Ok(self.build_report(user_ids.len(), config.result_count, totals))
    }

    fn evaluate_user(&self, user_id: UserId, config: &RecommendConfig, acc: &mut Accumulator) {
        let ranked =
            self.recommender
                .recommend(user_id, config.neighbor_count, config.result_count);
        let test_items = self.test.user_ratings(user_id);

        acc.test_interactions += test_items.map_or(0, |items| items.len());

        for entry in ranked {
            if test_items.is_some_and(|items| items.contains_key(&entry.item_id)) {
                acc.hits += 1;
            }

            let item_popularity = self
                .train
                .item_ratings(entry.item_id)
                .map_or(0, |raters| raters.len());
            acc.popularity_sum += (1.0 + item_popularity as f64).ln();
            acc.recommended_instances += 1;
            acc.recommended_items.insert(entry.item_id);
        }
    }

    fn build_report(
        &self,
        users_evaluated: usize,
        result_count: usize,
        totals: Accumulator,
    ) -> EvalReport {
        let precision_denominator = users_evaluated * result_count;
        let training_items = self.train.item_count();

        EvalReport {
            precision: ratio(totals.hits as f64, precision_denominator as f64),
            recall: ratio(totals.hits as f64, totals.test_interactions as f64),
            coverage: ratio(totals.recommended_items.len() as f64, training_items as f64),
            popularity: ratio(totals.popularity_sum, totals.recommended_instances as f64),
            users_evaluated,
            hits: totals.hits,
        }
    }
}

/// `None` when the denominator is zero: the metric is undefined, not 0
fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}
