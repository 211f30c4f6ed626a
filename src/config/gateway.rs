//! Tool gateway configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the remote JSON-RPC tool gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the gateway endpoint
    #[serde(default = "default_url")]
    pub url: String,

    /// API key appended to the gateway URL as a query parameter
    pub api_key: Option<Secret<String>>,

    /// Client name reported during the initialize handshake
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Client version reported during the initialize handshake
    #[serde(default = "default_client_version")]
    pub client_version: String,

    /// Request timeout in seconds for gateway calls
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Full endpoint URL, with the API key attached when configured.
    pub fn endpoint(&self) -> String {
        match &self.api_key {
            Some(key) if !key.expose_secret().is_empty() => {
                format!("{}?key={}", self.url, key.expose_secret())
            }
            _ => self.url.clone(),
        }
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::InvalidGatewayUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
            client_name: default_client_name(),
            client_version: default_client_version(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_url() -> String {
    "https://mcp.amap.com/mcp".to_string()
}

fn default_client_name() -> String {
    "wayfinder".to_string()
}

fn default_client_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_config_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.url, "https://mcp.amap.com/mcp");
        assert_eq!(config.client_name, "wayfinder");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_endpoint_without_key() {
        let config = GatewayConfig::default();
        assert_eq!(config.endpoint(), "https://mcp.amap.com/mcp");
    }

    #[test]
    fn test_endpoint_with_key() {
        let config = GatewayConfig {
            api_key: Some(Secret::new("abc123".to_string())),
            ..Default::default()
        };
        assert_eq!(config.endpoint(), "https://mcp.amap.com/mcp?key=abc123");
    }

    #[test]
    fn test_endpoint_with_empty_key() {
        let config = GatewayConfig {
            api_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert_eq!(config.endpoint(), "https://mcp.amap.com/mcp");
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let config = GatewayConfig {
            url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_accepts_default() {
        assert!(GatewayConfig::default().validate().is_ok());
    }
}
