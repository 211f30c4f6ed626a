//! Configuration error types.

use thiserror::Error;

/// Errors that occur while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Read(#[from] config::ConfigError),
}

/// Errors produced by semantic validation of loaded configuration.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("missing required configuration value: {0}")]
    MissingRequired(&'static str),

    #[error("server port must be non-zero")]
    InvalidPort,

    #[error("server host and port do not form a bindable address")]
    InvalidBindAddress,

    #[error("request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("gateway url must start with http:// or https://")]
    InvalidGatewayUrl,

    #[error("reasoning model list must contain at least one model")]
    NoReasoningModel,

    #[error("max iterations must be between 1 and 100")]
    InvalidIterationBound,
}
