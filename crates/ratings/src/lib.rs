//! # Ratings Crate
//!
//! This crate handles loading sparse user-item rating data for the
//! collaborative filtering engine.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Rating, UserId, ItemId)
//! - **store**: RatingStore, the sparse interaction store in both orientations
//! - **parser**: Parse delimited rating files into Rust structs
//! - **split**: Seeded train/test splitting for offline evaluation
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use ratings::{parse_ratings, split_ratings, ParseOptions, SplitConfig};
//! use std::path::Path;
//!
//! // Load a MovieLens ratings file
//! let records = parse_ratings(Path::new("data/ml-1m/ratings.dat"), &ParseOptions::default())?;
//!
//! // Split into train and test stores
//! let (train, test) = split_ratings(&records, SplitConfig::default());
//!
//! println!(
//!     "{} users rated {} items",
//!     train.user_count(),
//!     train.item_count()
//! );
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod store;
pub mod parser;
pub mod split;

// Re-export commonly used types for convenience
pub use error::{RatingsError, Result};
pub use parser::{ParseOptions, parse_ratings};
pub use split::{SplitConfig, split_ratings};
pub use store::RatingStore;
pub use types::{ItemId, Rating, UserId};
