//! Analysis loop configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Tuning knobs for the orchestration loop and conversation registry.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Upper bound on reasoning consultations per analysis run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Whether to request a high-level plan before iterating
    #[serde(default = "default_plan_first")]
    pub plan_first: bool,

    /// Maximum live conversation sessions before LRU eviction
    #[serde(default = "default_conversation_capacity")]
    pub conversation_capacity: usize,
}

impl AnalysisConfig {
    /// Validate analysis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_iterations == 0 || self.max_iterations > 100 {
            return Err(ValidationError::InvalidIterationBound);
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            plan_first: default_plan_first(),
            conversation_capacity: default_conversation_capacity(),
        }
    }
}

fn default_max_iterations() -> u32 {
    15
}

fn default_plan_first() -> bool {
    true
}

fn default_conversation_capacity() -> usize {
    1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_config_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.max_iterations, 15);
        assert!(config.plan_first);
        assert_eq!(config.conversation_capacity, 1024);
    }

    #[test]
    fn test_validation_rejects_zero_iterations() {
        let config = AnalysisConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_excessive_iterations() {
        let config = AnalysisConfig {
            max_iterations: 500,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
