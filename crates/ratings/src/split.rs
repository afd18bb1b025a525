//! Seeded train/test splitting of rating records.
//!
//! Each record is assigned to the test partition with probability
//! 1/(M+1): a pseudo-random draw in `0..=M` equal to `k` selects the test
//! split, everything else lands in training. Running the split M+1 times
//! with the same seed and k = 0..M produces M+1 disjoint test folds.

use crate::store::RatingStore;
use crate::types::Rating;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Parameters for the train/test split
#[derive(Debug, Clone, Copy)]
pub struct SplitConfig {
    /// Upper bound of the draw; a record is a test record when the draw
    /// in `0..=m` equals `k`
    pub m: u32,
    /// Selected test fold, `0 <= k <= m`
    pub k: u32,
    /// Seed for the random number generator, fixed for reproducible runs
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self { m: 8, k: 3, seed: 47 }
    }
}

/// Split rating records into train and test stores.
///
/// Every input record ends up in exactly one partition. The draw sequence
/// is a pure function of the seed, so a fixed (m, k, seed) triple always
/// reproduces the same split.
pub fn split_ratings(records: &[Rating], config: SplitConfig) -> (RatingStore, RatingStore) {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut train = RatingStore::new();
    let mut test = RatingStore::new();

    for &rating in records {
        if rng.random_range(0..=config.m) == config.k {
            test.insert(rating);
        } else {
            train.insert(rating);
        }
    }

    info!(
        "Split {} records into {} train / {} test interactions",
        records.len(),
        train.rating_count(),
        test.rating_count()
    );

    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records(count: u32) -> Vec<Rating> {
        (0..count)
            .map(|i| Rating {
                user_id: i % 50,
                item_id: i,
                score: 1.0 + (i % 5) as f32,
                timestamp: None,
            })
            .collect()
    }

    #[test]
    fn test_every_record_lands_in_one_partition() {
        let records = sample_records(500);
        let config = SplitConfig { m: 8, k: 3, seed: 47 };

        let (train, test) = split_ratings(&records, config);

        // All records are distinct (user, item) pairs with positive scores
        assert_eq!(train.rating_count() + test.rating_count(), records.len());
    }

    #[test]
    fn test_split_is_deterministic_for_fixed_seed() {
        let records = sample_records(300);
        let config = SplitConfig { m: 8, k: 3, seed: 1000 };

        let (train_a, test_a) = split_ratings(&records, config);
        let (train_b, test_b) = split_ratings(&records, config);

        assert_eq!(train_a.fingerprint(), train_b.fingerprint());
        assert_eq!(test_a.fingerprint(), test_b.fingerprint());
    }

    #[test]
    fn test_different_seed_changes_split() {
        let records = sample_records(300);
        let (_, test_a) = split_ratings(&records, SplitConfig { m: 8, k: 3, seed: 1 });
        let (_, test_b) = split_ratings(&records, SplitConfig { m: 8, k: 3, seed: 2 });

        assert_ne!(test_a.fingerprint(), test_b.fingerprint());
    }

    #[test]
    fn test_test_fold_is_roughly_one_in_m_plus_one() {
        let records = sample_records(9000);
        let config = SplitConfig { m: 8, k: 0, seed: 7 };

        let (_, test) = split_ratings(&records, config);

        // Expect about 1/9 of the records; allow a generous tolerance
        let fraction = test.rating_count() as f64 / records.len() as f64;
        assert!(fraction > 0.05 && fraction < 0.20, "fraction = {fraction}");
    }
}
