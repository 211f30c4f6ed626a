//! JSON-RPC 2.0 wire types for the tool gateway.
//!
//! Every outbound request carries a locally generated integer id; responses
//! are correlated only by that id.

use serde::{Deserialize, Serialize};

/// JSON-RPC version sent on every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Gateway protocol version sent during the initialize handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// An outbound JSON-RPC request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: i64,
    pub method: &'static str,
    pub params: serde_json::Value,
}

impl JsonRpcRequest {
    /// Builds the `initialize` handshake request.
    pub fn initialize(id: i64, client_name: &str, client_version: &str) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: "initialize",
            params: serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "clientInfo": {
                    "name": client_name,
                    "version": client_version,
                },
            }),
        }
    }

    /// Builds a `tools/list` request.
    pub fn list_tools(id: i64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: "tools/list",
            params: serde_json::json!({}),
        }
    }

    /// Builds a `tools/call` request.
    pub fn call_tool(id: i64, name: &str, arguments: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: "tools/call",
            params: serde_json::json!({
                "name": name,
                "arguments": arguments,
            }),
        }
    }
}

/// An inbound JSON-RPC response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// A JSON-RPC error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_request_has_handshake_shape() {
        let request = JsonRpcRequest::initialize(1, "wayfinder", "0.1.0");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 1);
        assert_eq!(json["method"], "initialize");
        assert_eq!(json["params"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(json["params"]["clientInfo"]["name"], "wayfinder");
        assert!(json["params"]["capabilities"]["tools"].is_object());
    }

    #[test]
    fn list_tools_request_has_empty_params() {
        let request = JsonRpcRequest::list_tools(2);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["method"], "tools/list");
        assert_eq!(json["params"], serde_json::json!({}));
    }

    #[test]
    fn call_tool_request_carries_name_and_arguments() {
        let request = JsonRpcRequest::call_tool(
            3,
            "maps_geo",
            serde_json::json!({"address": "Beijing"}),
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["method"], "tools/call");
        assert_eq!(json["params"]["name"], "maps_geo");
        assert_eq!(json["params"]["arguments"]["address"], "Beijing");
    }

    #[test]
    fn response_deserializes_result_envelope() {
        let json = r#"{"jsonrpc":"2.0","id":5,"result":{"tools":[]}}"#;
        let response: JsonRpcResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.id, Some(5));
        assert!(response.result.is_some());
        assert!(response.error.is_none());
    }

    #[test]
    fn response_deserializes_error_envelope() {
        let json = r#"{"jsonrpc":"2.0","id":5,"error":{"code":-32601,"message":"method not found"}}"#;
        let response: JsonRpcResponse = serde_json::from_str(json).unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "method not found");
    }

    #[test]
    fn response_tolerates_missing_id() {
        let response: JsonRpcResponse = serde_json::from_str(r#"{"jsonrpc":"2.0"}"#).unwrap();
        assert_eq!(response.id, None);
    }
}
