//! Core domain types for rating data.
//!
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (UserId, ItemId)
//! - Small, copyable structs
//! - Derive macros for common traits

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with item IDs

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for an item (a movie in the MovieLens datasets)
pub type ItemId = u32;

// =============================================================================
// Rating Type
// =============================================================================

/// A single (user, item, score) interaction record.
///
/// A score of `0` means "no observed interaction" and is treated exactly like
/// an absent record: the sparse store never materializes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Interaction score, non-negative. For MovieLens data this is the
    /// 1.0 - 5.0 star rating.
    pub score: f32,
    /// Unix timestamp when the rating was made, if the source file carries one
    pub timestamp: Option<i64>,
}

impl Rating {
    /// True if this record counts as an observed interaction
    pub fn is_positive(&self) -> bool {
        self.score > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_score_is_not_positive() {
        let rating = Rating {
            user_id: 1,
            item_id: 7,
            score: 0.0,
            timestamp: None,
        };
        assert!(!rating.is_positive());
    }

    #[test]
    fn test_positive_score() {
        let rating = Rating {
            user_id: 1,
            item_id: 7,
            score: 3.5,
            timestamp: Some(978300760),
        };
        assert!(rating.is_positive());
    }
}
