//! Integration tests for the evaluation pipeline.
//!
//! These tests run the full chain - store, similarity matrix, recommender,
//! evaluator - over a small hand-checkable dataset.

use cf::{ItemBasedRecommender, RecommendConfig, Recommender, UserBasedRecommender, Weighting};
use evaluation::Evaluator;
use ratings::{Rating, RatingStore};
use std::sync::Arc;

/// Users 1-4 over items 1-5:
/// 1:{1:3, 2:4, 4:3.5}, 2:{1:4, 3:4.5, 5:3.5}, 3:{2:3.5, 5:3}, 4:{2:4, 4:3.5, 5:3}
fn create_train_store() -> Arc<RatingStore> {
    let records = [
        (1, 1, 3.0),
        (1, 2, 4.0),
        (1, 4, 3.5),
        (2, 1, 4.0),
        (2, 3, 4.5),
        (2, 5, 3.5),
        (3, 2, 3.5),
        (3, 5, 3.0),
        (4, 2, 4.0),
        (4, 4, 3.5),
        (4, 5, 3.0),
    ];
    Arc::new(RatingStore::from_ratings(records.into_iter().map(
        |(user_id, item_id, score)| Rating {
            user_id,
            item_id,
            score,
            timestamp: None,
        },
    )))
}

fn create_test_store() -> RatingStore {
    let records = [(1, 5, 4.0), (2, 2, 3.0), (3, 4, 4.0)];
    RatingStore::from_ratings(records.into_iter().map(|(user_id, item_id, score)| Rating {
        user_id,
        item_id,
        score,
        timestamp: None,
    }))
}

fn config(neighbor_count: usize, result_count: usize) -> RecommendConfig {
    RecommendConfig {
        neighbor_count,
        result_count,
        popularity_penalty: false,
    }
}

#[test]
fn test_user_based_end_to_end() {
    let train = create_train_store();
    let test = create_test_store();

    let recommender = UserBasedRecommender::fit(train.clone(), Weighting::Uniform);
    let evaluator = Evaluator::new(&recommender, &train, &test);

    let report = evaluator.evaluate(&config(3, 2)).unwrap();

    assert_eq!(report.users_evaluated, 4);
    // All four metrics are defined on this split
    assert!(report.precision.is_some());
    assert!(report.recall.is_some());
    assert!(report.coverage.is_some());
    assert!(report.popularity.is_some());

    // Item 5 is unseen for user 1 and strongly co-rated by its neighbors,
    // so the split was built to contain at least one hit
    assert!(report.hits >= 1);
    assert!(report.precision.unwrap() > 0.0);
    assert!(report.precision.unwrap() <= 1.0);
    assert!(report.recall.unwrap() <= 1.0);
}

#[test]
fn test_item_based_end_to_end() {
    let train = create_train_store();
    let test = create_test_store();

    let recommender = ItemBasedRecommender::fit(train.clone(), Weighting::InverseLogFrequency);
    let evaluator = Evaluator::new(&recommender, &train, &test);

    let report = evaluator.evaluate(&config(3, 2)).unwrap();

    assert_eq!(report.users_evaluated, 4);
    assert!(report.precision.is_some());
    assert!(report.coverage.unwrap() <= 1.0);
}

#[test]
fn test_coverage_is_monotone_in_result_count() {
    let train = create_train_store();
    let test = create_test_store();

    let recommender = UserBasedRecommender::fit(train.clone(), Weighting::Uniform);
    let evaluator = Evaluator::new(&recommender, &train, &test);

    let mut previous = 0.0;
    for result_count in 1..=4 {
        let report = evaluator.evaluate(&config(3, result_count)).unwrap();
        let coverage = report.coverage.unwrap();
        assert!(
            coverage >= previous,
            "coverage shrank from {previous} to {coverage} at N={result_count}"
        );
        previous = coverage;
    }
}

#[test]
fn test_recommendations_stay_out_of_the_training_profile() {
    let train = create_train_store();

    let recommender = UserBasedRecommender::fit(train.clone(), Weighting::Uniform);

    for user_id in 1..=4 {
        let profile = train.user_ratings(user_id).unwrap();
        for entry in recommender.recommend(user_id, 3, 5) {
            assert!(
                !profile.contains_key(&entry.item_id),
                "user {user_id} was recommended item {} it already rated",
                entry.item_id
            );
        }
    }
}

#[test]
fn test_plain_and_penalized_runs_both_complete() {
    let train = create_train_store();
    let test = create_test_store();

    for popularity_penalty in [false, true] {
        let config = RecommendConfig {
            neighbor_count: 3,
            result_count: 2,
            popularity_penalty,
        };
        let recommender = UserBasedRecommender::fit(train.clone(), config.weighting());
        let evaluator = Evaluator::new(&recommender, &train, &test);

        let report = evaluator.evaluate(&config).unwrap();
        assert!(report.precision.is_some());
    }
}
