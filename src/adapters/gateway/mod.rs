//! Tool gateway adapters.
//!
//! - `HttpToolGateway` - JSON-RPC 2.0 over HTTP, the production client
//! - `MockToolGateway` - configurable in-memory gateway for tests

mod http_client;
mod mock;
mod protocol;

pub use http_client::HttpToolGateway;
pub use mock::{MockGatewayResponse, MockToolGateway};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION, PROTOCOL_VERSION};
