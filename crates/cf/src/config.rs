//! Recommendation run configuration.

use crate::similarity::Weighting;
use thiserror::Error;

/// Invalid configuration surfaced at call time, never silently clamped
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("neighbor_count must be a positive integer")]
    ZeroNeighborCount,

    #[error("result_count must be a positive integer")]
    ZeroResultCount,
}

/// Knobs shared by the CLI and the evaluator.
///
/// The raw [`crate::Recommender::recommend`] call stays total and treats
/// zero K or N as a degenerate empty result; this config layer is where
/// zeroes are rejected as a caller mistake.
#[derive(Debug, Clone, Copy)]
pub struct RecommendConfig {
    /// Size K of the similarity neighborhood considered per recommendation
    pub neighbor_count: usize,
    /// Number N of items returned per recommendation
    pub result_count: usize,
    /// Penalize popular counterparts when computing similarity
    pub popularity_penalty: bool,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            neighbor_count: 8,
            result_count: 10,
            popularity_penalty: true,
        }
    }
}

impl RecommendConfig {
    /// Reject non-positive K or N
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.neighbor_count == 0 {
            return Err(ConfigError::ZeroNeighborCount);
        }
        if self.result_count == 0 {
            return Err(ConfigError::ZeroResultCount);
        }
        Ok(())
    }

    /// The similarity weighting this configuration selects
    pub fn weighting(&self) -> Weighting {
        if self.popularity_penalty {
            Weighting::InverseLogFrequency
        } else {
            Weighting::Uniform
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RecommendConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let config = RecommendConfig {
            neighbor_count: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroNeighborCount));

        let config = RecommendConfig {
            result_count: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroResultCount));
    }

    #[test]
    fn test_weighting_selection() {
        let penalized = RecommendConfig::default();
        assert_eq!(penalized.weighting(), Weighting::InverseLogFrequency);

        let plain = RecommendConfig {
            popularity_penalty: false,
            ..Default::default()
        };
        assert_eq!(plain.weighting(), Weighting::Uniform);
    }
}
