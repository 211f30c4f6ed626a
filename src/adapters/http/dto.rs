//! Request/response DTOs for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::application::MessageType;

/// Body for `POST /api/analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// The user's full request description.
    pub query: String,
    /// Optional caller context.
    #[serde(default)]
    pub context: serde_json::Value,
    /// Free-text preferences.
    #[serde(default)]
    pub preferences: String,
    /// Structured constraints (budget, time, ...).
    #[serde(default)]
    pub constraints: serde_json::Value,
}

/// Successful response for `POST /api/analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub response: String,
    pub analysis_type: String,
    pub tools_used: Vec<String>,
    pub metadata: AnalyzeMetadata,
}

/// Run metadata attached to analyze responses.
#[derive(Debug, Serialize)]
pub struct AnalyzeMetadata {
    pub query: String,
    pub tool_calls: usize,
    pub successful_calls: usize,
    pub data_categories: usize,
}

/// Body for `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user message.
    pub message: String,
    /// Session id for multi-turn context; omitted on the first turn.
    pub conversation_id: Option<String>,
}

/// Response for `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub conversation_id: String,
    pub message_type: MessageType,
    pub requires_action: bool,
    pub suggestions: Vec<String>,
    pub tools_used: Vec<String>,
}

/// Response for `GET /api/capabilities`.
#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub supported_scenarios: Vec<String>,
    pub available_tools: Vec<String>,
    pub example_queries: Vec<String>,
}

/// Response for `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub reasoning_available: bool,
    pub gateway_available: bool,
    pub gateway_tools: usize,
    pub timestamp: String,
}

/// One entry of `GET /api/examples`.
#[derive(Debug, Serialize)]
pub struct UsageExample {
    pub category: &'static str,
    pub query: &'static str,
    pub expected_analysis: Vec<&'static str>,
}

/// Response for `GET /api/examples`.
#[derive(Debug, Serialize)]
pub struct ExamplesResponse {
    pub usage_examples: Vec<UsageExample>,
}

/// Structured error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    /// Creates an error body.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_request_fills_optional_fields() {
        let request: AnalyzeRequest =
            serde_json::from_str(r#"{"query": "find a hotel"}"#).unwrap();

        assert_eq!(request.query, "find a hotel");
        assert!(request.context.is_null());
        assert!(request.preferences.is_empty());
    }

    #[test]
    fn chat_request_accepts_missing_conversation_id() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert!(request.conversation_id.is_none());
    }

    #[test]
    fn error_response_serializes_with_success_false() {
        let json = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
    }
}
