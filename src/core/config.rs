//! Engine configuration.
//!
//! Hosts configure the evaluator at startup. Everything here has a sensible
//! default, so `EngineConfig::default()` is a valid configuration.

use serde::{Deserialize, Serialize};

use super::error::RuleError;

/// Default maximum sub-event nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Evaluator configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Deepest sub-event level the evaluator will descend into.
    ///
    /// Top-level events are depth 1. Sub-events nested deeper than this are
    /// skipped with a warning rather than recursing without bound.
    pub max_depth: usize,

    /// Seed for the deterministic roll stream used by chance predicates.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth (builder pattern).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the roll seed (builder pattern).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the configuration for values the evaluator cannot run with.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.max_depth == 0 {
            return Err(RuleError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.seed, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new().with_max_depth(4).with_seed(99);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.seed, 99);
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = EngineConfig::new().with_max_depth(0);
        assert!(matches!(config.validate(), Err(RuleError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }
}
