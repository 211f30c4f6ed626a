//! Mock Reasoning Backend for testing.
//!
//! Queued responses, error injection, and call tracking so the failover
//! client and the analysis loop can be exercised without a live backend.
//!
//! # Example
//!
//! ```ignore
//! let backend = MockReasoningBackend::new()
//!     .with_response("CALL_TOOL\ntool: maps_geo\narguments: {}\nreason: start")
//!     .with_error(MockReasoningError::Quota);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{GenerationOptions, ReasoningBackend, ReasoningError};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockReasoningResponse {
    /// Return a successful completion.
    Success(String),
    /// Return an error.
    Error(MockReasoningError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone, Copy)]
pub enum MockReasoningError {
    /// Simulate a rate-limit/quota failure.
    Quota,
    /// Simulate the backend being down.
    Unavailable,
    /// Simulate a network failure.
    Network,
    /// Simulate an authentication failure.
    AuthenticationFailed,
}

impl From<MockReasoningError> for ReasoningError {
    fn from(err: MockReasoningError) -> Self {
        match err {
            MockReasoningError::Quota => ReasoningError::quota("simulated quota failure"),
            MockReasoningError::Unavailable => {
                ReasoningError::unavailable("simulated backend outage")
            }
            MockReasoningError::Network => ReasoningError::network("simulated network failure"),
            MockReasoningError::AuthenticationFailed => ReasoningError::AuthenticationFailed,
        }
    }
}

/// Mock reasoning backend for testing.
#[derive(Debug, Clone)]
pub struct MockReasoningBackend {
    /// Queued responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockReasoningResponse>>>,
    /// Response returned once the queue is drained.
    default_response: Arc<Mutex<MockReasoningResponse>>,
    /// Models requested, in call order.
    models: Arc<Mutex<Vec<String>>>,
    /// Prompts received, in call order.
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Default for MockReasoningBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReasoningBackend {
    /// Creates a new mock backend.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            default_response: Arc::new(Mutex::new(MockReasoningResponse::Success(
                "Mock reasoning response".to_string(),
            ))),
            models: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful completion.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockReasoningResponse::Success(content.into()));
        self
    }

    /// Queues an error response.
    pub fn with_error(self, error: MockReasoningError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockReasoningResponse::Error(error));
        self
    }

    /// Sets the response returned once the queue is drained.
    pub fn with_default_response(self, content: impl Into<String>) -> Self {
        *self.default_response.lock().unwrap() =
            MockReasoningResponse::Success(content.into());
        self
    }

    /// Makes every drained-queue call fail with the given error.
    pub fn with_default_error(self, error: MockReasoningError) -> Self {
        *self.default_response.lock().unwrap() = MockReasoningResponse::Error(error);
        self
    }

    /// Returns the number of generate calls made.
    pub fn call_count(&self) -> usize {
        self.models.lock().unwrap().len()
    }

    /// Returns the models requested, in call order.
    pub fn models_called(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }

    /// Returns the prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_response(&self) -> MockReasoningResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_response.lock().unwrap().clone())
    }
}

#[async_trait]
impl ReasoningBackend for MockReasoningBackend {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, ReasoningError> {
        self.models.lock().unwrap().push(model.to_string());
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.next_response() {
            MockReasoningResponse::Success(content) => Ok(content),
            MockReasoningResponse::Error(err) => Err(err.into()),
        }
    }
}
