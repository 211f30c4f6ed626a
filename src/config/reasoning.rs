//! Reasoning engine configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the generative reasoning backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ReasoningConfig {
    /// API key for the generative backend
    pub api_key: Option<Secret<String>>,

    /// Ordered model identifiers, comma-separated, tried first to last
    pub models: Option<String>,

    /// Base URL of the generative API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base delay in seconds for exponential backoff
    #[serde(default = "default_base_delay")]
    pub base_delay_secs: u64,

    /// Maximum retries before a request is given up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ReasoningConfig {
    /// Ordered model list, falling back to the built-in defaults.
    pub fn models_list(&self) -> Vec<String> {
        let parsed: Vec<String> = self
            .models
            .as_ref()
            .map(|s| {
                s.split(',')
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if parsed.is_empty() {
            default_models()
        } else {
            parsed
        }
    }

    /// Exposes the API key for request building.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }

    /// Get base delay as Duration
    pub fn base_delay(&self) -> Duration {
        Duration::from_secs(self.base_delay_secs)
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate reasoning configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key().map_or(true, |k| k.is_empty()) {
            return Err(ValidationError::MissingRequired(
                "WAYFINDER__REASONING__API_KEY",
            ));
        }
        if self.models_list().is_empty() {
            return Err(ValidationError::NoReasoningModel);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            models: None,
            base_url: default_base_url(),
            base_delay_secs: default_base_delay(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "gemini-2.0-flash-exp".to_string(),
        "gemini-2.5-pro".to_string(),
    ]
}

fn default_base_delay() -> u64 {
    1
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout() -> u64 {
    60
}
