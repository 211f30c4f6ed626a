//! HTTP Tool Gateway - JSON-RPC 2.0 client over HTTP POST.
//!
//! Manages one logical session against the remote tool service:
//! `connect` performs the `initialize` handshake and loads the tool catalog;
//! `call_tool` issues correlated `tools/call` requests. The underlying
//! keep-alive connection pool is released when the client is dropped, on
//! every exit path.
//!
//! # Correlation
//!
//! Request ids are strictly increasing within one client lifetime and never
//! reused. A response whose id does not match its request is a protocol
//! violation, distinct from an application-level tool error.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, error, info, warn};

use crate::config::GatewayConfig;
use crate::ports::{GatewayError, ToolDescriptor, ToolGateway};

use super::protocol::{JsonRpcRequest, JsonRpcResponse};

/// JSON-RPC tool gateway client over HTTP.
pub struct HttpToolGateway {
    endpoint: String,
    client: Client,
    client_name: String,
    client_version: String,
    next_id: AtomicI64,
    tools: Vec<ToolDescriptor>,
}

impl HttpToolGateway {
    /// Opens a gateway session: handshake, then catalog load.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Unavailable` if the transport cannot be
    /// established or the `initialize` call does not succeed. A failed
    /// `tools/list` is non-fatal: the session continues with an empty
    /// catalog.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::unavailable(format!("failed to build HTTP client: {e}")))?;

        let mut gateway = Self {
            endpoint: config.endpoint(),
            client,
            client_name: config.client_name.clone(),
            client_version: config.client_version.clone(),
            next_id: AtomicI64::new(0),
            tools: Vec::new(),
        };

        gateway.initialize().await?;

        if let Err(err) = gateway.load_tools().await {
            warn!(error = %err, "failed to load tool catalog; continuing with no tools");
        }

        Ok(gateway)
    }

    /// Allocates the next correlation id. Strictly increasing, never reused.
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn post(&self, request: &JsonRpcRequest) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/event-stream")
            .json(request)
            .send()
            .await
    }

    /// Verifies that a response correlates with the request that caused it.
    fn check_correlation(
        &self,
        response: &JsonRpcResponse,
        expected_id: i64,
    ) -> Result<(), GatewayError> {
        match response.id {
            Some(id) if id == expected_id => Ok(()),
            Some(id) => Err(GatewayError::protocol(format!(
                "response id {id} does not match request id {expected_id}"
            ))),
            None => Err(GatewayError::protocol(format!(
                "response is missing an id (expected {expected_id})"
            ))),
        }
    }

    async fn initialize(&self) -> Result<(), GatewayError> {
        let request =
            JsonRpcRequest::initialize(self.next_id(), &self.client_name, &self.client_version);

        let response = self
            .post(&request)
            .await
            .map_err(|e| GatewayError::unavailable(format!("initialize failed: {e}")))?;

        if !response.status().is_success() {
            return Err(GatewayError::unavailable(format!(
                "initialize returned status {}",
                response.status()
            )));
        }

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::unavailable(format!("initialize response unreadable: {e}")))?;
        self.check_correlation(&body, request.id)?;

        debug!(endpoint = %self.endpoint, "gateway session initialized");
        Ok(())
    }

    async fn load_tools(&mut self) -> Result<(), GatewayError> {
        let request = JsonRpcRequest::list_tools(self.next_id());

        let response = self
            .post(&request)
            .await
            .map_err(|e| GatewayError::unavailable(format!("tools/list failed: {e}")))?;

        if !response.status().is_success() {
            return Err(GatewayError::unavailable(format!(
                "tools/list returned status {}",
                response.status()
            )));
        }

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::unavailable(format!("tools/list response unreadable: {e}")))?;
        self.check_correlation(&body, request.id)?;

        if let Some(tools) = body.result.as_ref().and_then(|r| r.get("tools")) {
            self.tools = serde_json::from_value(tools.clone())
                .map_err(|e| GatewayError::protocol(format!("malformed tool catalog: {e}")))?;
            for tool in &self.tools {
                info!(tool = %tool.name, "loaded gateway tool");
            }
        }

        Ok(())
    }
}

/// Builds the `{"error": ...}` sentinel returned for failed tool calls.
fn error_sentinel(tool_name: &str, reason: &str) -> serde_json::Value {
    serde_json::json!({
        "error": format!("failed to call tool {tool_name}: {reason}"),
    })
}

#[async_trait]
impl ToolGateway for HttpToolGateway {
    fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let request = JsonRpcRequest::call_tool(self.next_id(), name, arguments);
        debug!(tool = name, id = request.id, "calling gateway tool");

        let response = match self.post(&request).await {
            Ok(response) => response,
            Err(err) => {
                error!(tool = name, error = %err, "gateway transport error");
                return Ok(error_sentinel(name, &err.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(tool = name, %status, "gateway returned error status");
            return Ok(error_sentinel(name, &format!("status {status}: {body}")));
        }

        let body: JsonRpcResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                return Ok(error_sentinel(name, &format!("unreadable response: {err}")));
            }
        };
        self.check_correlation(&body, request.id)?;

        if let Some(err) = body.error {
            return Ok(error_sentinel(
                name,
                &format!("tool error {}: {}", err.code, err.message),
            ));
        }

        debug!(tool = name, "tool result received");
        Ok(body.result.unwrap_or(serde_json::Value::Null))
    }
}
