//! Gemini Backend - ReasoningBackend implementation for Google's
//! Generative Language API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_base_url("https://generativelanguage.googleapis.com");
//!
//! let backend = GeminiBackend::new(config);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{GenerationOptions, ReasoningBackend, ReasoningError};

/// Configuration for the Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API backend implementation.
pub struct GeminiBackend {
    config: GeminiConfig,
    client: Client,
}

impl GeminiBackend {
    /// Creates a new Gemini backend with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ReasoningError::Network` if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, ReasoningError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ReasoningError::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Builds the generateContent endpoint URL for a model.
    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url,
            model,
            self.config.api_key()
        )
    }

    fn to_gemini_request(prompt: &str, options: &GenerationOptions) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
                candidate_count: 1,
            },
        }
    }

    /// Maps an error status and body to the reasoning error taxonomy.
    fn classify_status(status: u16, body: &str) -> ReasoningError {
        match status {
            401 | 403 => ReasoningError::AuthenticationFailed,
            429 => ReasoningError::quota(format!("status 429: {body}")),
            400 if body.contains("RESOURCE_EXHAUSTED") || body.contains("quota") => {
                ReasoningError::quota(format!("status 400: {body}"))
            }
            500..=599 => ReasoningError::unavailable(format!("server error {status}: {body}")),
            _ => ReasoningError::network(format!("unexpected status {status}: {body}")),
        }
    }

    fn extract_text(response: GeminiResponse) -> Result<String, ReasoningError> {
        let text: String = response
            .candidates
            .into_iter()
            .flat_map(|c| c.content.map(|content| content.parts).unwrap_or_default())
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            Err(ReasoningError::parse("no candidate text in response"))
        } else {
            Ok(text)
        }
    }
}

#[async_trait]
impl ReasoningBackend for GeminiBackend {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ReasoningError> {
        let request = Self::to_gemini_request(prompt, options);

        let response = self
            .client
            .post(self.generate_url(model))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReasoningError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else {
                    ReasoningError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status.as_u16(), &body));
        }

        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::parse(format!("failed to parse response: {e}")))?;

        Self::extract_text(body)
    }
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(rename = "candidateCount")]
    candidate_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = GeminiConfig::new("test-key")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn generate_url_embeds_model_and_key() {
        let backend = GeminiBackend::new(GeminiConfig::new("k123")).unwrap();
        let url = backend.generate_url("gemini-2.5-pro");
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro:generateContent?key=k123"
        );
    }

    #[test]
    fn request_serializes_with_generation_config() {
        let options = GenerationOptions::default().with_temperature(0.1);
        let request = GeminiBackend::to_gemini_request("hello", &options);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["temperature"], 0.1);
        assert_eq!(json["generationConfig"]["candidateCount"], 1);
        assert!(json["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn status_429_classifies_as_quota() {
        let err = GeminiBackend::classify_status(429, "rate limit");
        assert!(err.is_quota());
    }

    #[test]
    fn resource_exhausted_body_classifies_as_quota() {
        let err = GeminiBackend::classify_status(400, r#"{"status":"RESOURCE_EXHAUSTED"}"#);
        assert!(err.is_quota());
    }

    #[test]
    fn auth_statuses_classify_as_authentication() {
        assert!(matches!(
            GeminiBackend::classify_status(401, ""),
            ReasoningError::AuthenticationFailed
        ));
        assert!(matches!(
            GeminiBackend::classify_status(403, ""),
            ReasoningError::AuthenticationFailed
        ));
    }

    #[test]
    fn server_errors_classify_as_unavailable() {
        assert!(matches!(
            GeminiBackend::classify_status(503, "overloaded"),
            ReasoningError::Unavailable { .. }
        ));
    }

    #[test]
    fn extract_text_joins_parts() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(GeminiBackend::extract_text(response).unwrap(), "Hello world");
    }

    #[test]
    fn extract_text_rejects_empty_candidates() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            GeminiBackend::extract_text(response),
            Err(ReasoningError::Parse(_))
        ));
    }
}
