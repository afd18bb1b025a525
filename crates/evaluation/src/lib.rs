//! Offline evaluation for the collaborative filtering engine.
//!
//! This crate provides:
//! - `Evaluator`, which drives any `cf::Recommender` over every training
//!   user on a rayon worker pool
//! - `EvalReport`, the aggregated precision / recall / coverage /
//!   popularity metrics
//!
//! ## Example Usage
//! ```ignore
//! use cf::{RecommendConfig, UserBasedRecommender, Weighting};
//! use evaluation::Evaluator;
//!
//! let recommender = UserBasedRecommender::fit(train.clone(), Weighting::InverseLogFrequency);
//! let evaluator = Evaluator::new(&recommender, &train, &test);
//!
//! let report = evaluator.evaluate(&RecommendConfig::default())?;
//! println!("precision: {:?}, recall: {:?}", report.precision, report.recall);
//! ```

pub mod metrics;

// Re-export main types
pub use metrics::{EvalReport, Evaluator};
