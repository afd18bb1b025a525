//! Benchmarks for the similarity engine and the recommenders
//!
//! Run with: cargo bench --package cf
//!
//! Uses a synthetic store so the benchmark has no dataset dependency.

use cf::{ItemBasedRecommender, Recommender, UserBasedRecommender, Weighting, similarity_matrix};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ratings::{Rating, RatingStore};
use std::sync::Arc;

/// Synthetic store: 500 users, ~40 ratings each over 1000 items, with a
/// deterministic overlap pattern so similarities are non-trivial
fn synthetic_store() -> Arc<RatingStore> {
    let mut records = Vec::new();
    for user in 0..500u32 {
        for slot in 0..40u32 {
            let item = (user * 7 + slot * 13) % 1000;
            let score = 1.0 + ((user + slot) % 5) as f32;
            records.push(Rating {
                user_id: user,
                item_id: item,
                score,
                timestamp: None,
            });
        }
    }
    Arc::new(RatingStore::from_ratings(records))
}

fn bench_similarity_plain(c: &mut Criterion) {
    let store = synthetic_store();

    c.bench_function("similarity_matrix_plain", |b| {
        b.iter(|| {
            let matrix = similarity_matrix(black_box(store.by_user()), Weighting::Uniform);
            black_box(matrix)
        })
    });
}

fn bench_similarity_penalized(c: &mut Criterion) {
    let store = synthetic_store();

    c.bench_function("similarity_matrix_penalized", |b| {
        b.iter(|| {
            let matrix =
                similarity_matrix(black_box(store.by_user()), Weighting::InverseLogFrequency);
            black_box(matrix)
        })
    });
}

fn bench_user_based_recommend(c: &mut Criterion) {
    let store = synthetic_store();
    let recommender = UserBasedRecommender::fit(store, Weighting::InverseLogFrequency);

    c.bench_function("user_based_recommend", |b| {
        b.iter(|| {
            let top = recommender.recommend(black_box(1), black_box(8), black_box(10));
            black_box(top)
        })
    });
}

fn bench_item_based_recommend(c: &mut Criterion) {
    let store = synthetic_store();
    let recommender = ItemBasedRecommender::fit(store, Weighting::InverseLogFrequency);

    c.bench_function("item_based_recommend", |b| {
        b.iter(|| {
            let top = recommender.recommend(black_box(1), black_box(8), black_box(10));
            black_box(top)
        })
    });
}

criterion_group!(
    benches,
    bench_similarity_plain,
    bench_similarity_penalized,
    bench_user_based_recommend,
    bench_item_based_recommend
);
criterion_main!(benches);
