//! Application layer: use cases exposed to the HTTP adapters.

mod service;

pub use service::{AnalysisService, Capabilities, ChatOutcome, HealthStatus, MessageType};
