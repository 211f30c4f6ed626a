//! Reasoning backend adapters.
//!
//! - `GeminiBackend` - Google Generative Language API transport
//! - `FailoverReasoningClient` - retry and model fallback over any backend
//! - `MockReasoningBackend` - scripted backend for tests

mod failover;
mod gemini;
mod mock;

pub use failover::FailoverReasoningClient;
pub use gemini::{GeminiBackend, GeminiConfig};
pub use mock::{MockReasoningBackend, MockReasoningError, MockReasoningResponse};
