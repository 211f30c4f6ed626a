//! Ports - interfaces the domain consumes, implemented by adapters.

mod gateway;
mod reasoning;

pub use gateway::{GatewayError, ToolDescriptor, ToolGateway};
pub use reasoning::{CompletionClient, GenerationOptions, ReasoningBackend, ReasoningError};
