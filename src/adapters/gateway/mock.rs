//! Mock Tool Gateway for testing.
//!
//! Configurable catalog, queued responses, and call tracking, allowing the
//! analysis loop to run without a live gateway.
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockToolGateway::new()
//!     .with_tool("maps_geo", "Geocode an address")
//!     .with_result(serde_json::json!({"content": []}));
//!
//! let result = gateway.call_tool("maps_geo", serde_json::json!({})).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{GatewayError, ToolDescriptor, ToolGateway};

/// A configured mock gateway response.
#[derive(Debug, Clone)]
pub enum MockGatewayResponse {
    /// Return a successful tool result.
    Result(serde_json::Value),
    /// Return the `{"error": ...}` failure sentinel.
    Failure(String),
    /// Return a protocol violation (fatal to the session).
    ProtocolError(String),
}

/// Mock tool gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct MockToolGateway {
    tools: Vec<ToolDescriptor>,
    /// Queued responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockGatewayResponse>>>,
    /// Recorded (tool name, arguments) pairs.
    calls: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
}

impl MockToolGateway {
    /// Creates a mock gateway with an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool to the catalog.
    pub fn with_tool(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.tools.push(ToolDescriptor::new(
            name,
            description,
            serde_json::json!({"type": "object", "properties": {}}),
        ));
        self
    }

    /// Queues a successful tool result.
    pub fn with_result(self, result: serde_json::Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockGatewayResponse::Result(result));
        self
    }

    /// Queues a failed call (error sentinel).
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockGatewayResponse::Failure(message.into()));
        self
    }

    /// Queues a protocol violation.
    pub fn with_protocol_error(self, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockGatewayResponse::ProtocolError(message.into()));
        self
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self) -> MockGatewayResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockGatewayResponse::Result(serde_json::json!({"status": "ok"})))
    }
}

#[async_trait]
impl ToolGateway for MockToolGateway {
    fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), arguments));

        match self.next_response() {
            MockGatewayResponse::Result(value) => Ok(value),
            MockGatewayResponse::Failure(message) => Ok(serde_json::json!({"error": message})),
            MockGatewayResponse::ProtocolError(message) => Err(GatewayError::protocol(message)),
        }
    }
}
