//! Tool Gateway Port - Interface to the remote tool-invocation service.
//!
//! The gateway exposes a catalog of callable operations (geocoding, routing,
//! place search) discovered at session start. Implementations own one
//! logical session: handshake, catalog load, and per-call correlation.
//!
//! # Failure model
//!
//! A failed individual tool call is *data*, not control flow: `call_tool`
//! returns an `{"error": ...}` sentinel value so that one bad call never
//! aborts the surrounding analysis. `Err` is reserved for session-level
//! failures (handshake, protocol violations).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Descriptor of one callable tool, loaded from the gateway catalog.
///
/// Immutable after load; one catalog per gateway session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool name (e.g. "maps_geo").
    pub name: String,

    /// Human-readable description shown to the reasoning engine.
    #[serde(default)]
    pub description: String,

    /// JSON Schema for the tool arguments.
    #[serde(rename = "inputSchema", default)]
    pub input_schema: serde_json::Value,
}

impl ToolDescriptor {
    /// Creates a new descriptor.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Formats this tool for a reasoning prompt: name, description, and the
    /// parameter names/types pulled from the input schema.
    pub fn describe(&self) -> String {
        let description = if self.description.is_empty() {
            "no description"
        } else {
            self.description.as_str()
        };
        let mut out = format!("**{}**: {}", self.name, description);

        if let Some(props) = self
            .input_schema
            .get("properties")
            .and_then(|p| p.as_object())
        {
            let params: Vec<String> = props
                .iter()
                .map(|(name, info)| {
                    let kind = info.get("type").and_then(|t| t.as_str()).unwrap_or("unknown");
                    match info.get("description").and_then(|d| d.as_str()) {
                        Some(desc) => format!("{} ({}): {}", name, kind, desc),
                        None => format!("{} ({})", name, kind),
                    }
                })
                .collect();
            if !params.is_empty() {
                out.push_str("\n  parameters: ");
                out.push_str(&params.join(", "));
            }
        }

        out
    }
}

/// Port for one logical session against the remote tool service.
#[async_trait]
pub trait ToolGateway: Send + Sync {
    /// Returns the tool catalog loaded at session start. An empty catalog
    /// means the reasoning engine is told no tools are available.
    fn tools(&self) -> &[ToolDescriptor];

    /// Invokes one tool with the given arguments.
    ///
    /// Transport and HTTP failures come back as an `{"error": ...}` sentinel
    /// inside `Ok`; `Err(GatewayError::Protocol)` signals an uncorrelated or
    /// malformed response and is fatal to the session.
    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError>;

    /// Formats the whole catalog for inclusion in a reasoning prompt.
    fn describe_tools(&self) -> String {
        if self.tools().is_empty() {
            return "no tools available".to_string();
        }
        self.tools()
            .iter()
            .map(ToolDescriptor::describe)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Tool gateway errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Transport or handshake failure; the session cannot be used.
    #[error("gateway unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Malformed or uncorrelated response; a contract violation upstream.
    #[error("gateway protocol violation: {message}")]
    Protocol {
        /// What was violated.
        message: String,
    },
}

impl GatewayError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a protocol violation error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}
