//! # CF Crate
//!
//! Collaborative filtering core: similarity computation, score prediction
//! and top-N recommendation generation over sparse rating data.
//!
//! ## Components
//!
//! - **inverted**: Reverse mapping counterpart → interacting entities, the
//!   index that keeps the similarity pass off the naive all-pairs scan
//! - **similarity**: Co-occurrence similarity engine, one parametrized
//!   algorithm covering the plain and popularity-penalized variants in
//!   either orientation (user-user or item-item)
//! - **recommend**: The `Recommender` trait with user-based and item-based
//!   implementations
//! - **cache**: Load-if-present / compute-and-store persistence for the
//!   similarity matrix
//! - **config**: Shared run configuration with validation
//!
//! ## Example Usage
//!
//! ```ignore
//! use cf::{Recommender, UserBasedRecommender, Weighting};
//! use ratings::RatingStore;
//! use std::sync::Arc;
//!
//! let train = Arc::new(RatingStore::from_ratings(records));
//!
//! let recommender = UserBasedRecommender::fit(train, Weighting::InverseLogFrequency);
//! let top = recommender.recommend(user_id, 8, 10);
//!
//! for entry in top {
//!     println!("{}: {:.3}", entry.item_id, entry.score);
//! }
//! ```

// Public modules
pub mod cache;
pub mod config;
pub mod inverted;
pub mod recommend;
pub mod similarity;

// Re-export commonly used types
pub use cache::SimilarityCache;
pub use config::{ConfigError, RecommendConfig};
pub use inverted::inverted_index;
pub use recommend::{ItemBasedRecommender, Recommender, ScoredItem, UserBasedRecommender};
pub use similarity::{SimilarityMatrix, Weighting, similarity_matrix};
