//! Reasoning Engine Port - Interface to generative text-completion backends.
//!
//! Two seams are defined here:
//!
//! - [`ReasoningBackend`] is the raw transport: one completion from one
//!   named model, no resilience.
//! - [`CompletionClient`] is what the analysis loop consumes: a completion
//!   with backend instability (quota errors, transient failures) already
//!   masked by retries and model fallback.

use async_trait::async_trait;

/// Options controlling a single completion.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Response randomness (0.0 = deterministic).
    pub temperature: Option<f32>,
    /// Cap on generated tokens.
    pub max_output_tokens: Option<u32>,
}

impl GenerationOptions {
    /// Sets the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the output token cap.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}

/// Raw transport to a generative backend.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    /// Generates a completion from the named model.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ReasoningError>;
}

/// Resilient completion interface consumed by the analysis loop.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Obtains a completion, masking backend instability from the caller.
    async fn complete(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ReasoningError>;
}

/// Reasoning engine errors.
#[derive(Debug, thiserror::Error)]
pub enum ReasoningError {
    /// Rate-limit/quota-class failure; triggers model fallback.
    #[error("quota exhausted: {message}")]
    Quota {
        /// Error details.
        message: String,
    },

    /// Backend is unavailable.
    #[error("backend unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the backend response.
    #[error("parse error: {0}")]
    Parse(String),

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// All models and retries are exhausted; fatal to the calling step.
    #[error("reasoning engine exhausted after {attempts} attempts")]
    Exhausted {
        /// Attempts made before giving up.
        attempts: u32,
    },
}

impl ReasoningError {
    /// Creates a quota error.
    pub fn quota(message: impl Into<String>) -> Self {
        Self::Quota {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true for rate-limit/quota-class errors that trigger an
    /// immediate switch to the next model.
    pub fn is_quota(&self) -> bool {
        matches!(self, ReasoningError::Quota { .. })
    }
}
