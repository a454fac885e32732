//! tokenwatch-rpc — the JSON-RPC plumbing under the ledger source.
//!
//! - [`RpcTransport`] — async trait every transport implements
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`] — wire types
//! - [`TransportError`] — structured error type
//! - [`RetryPolicy`] — exponential backoff for transient failures
//! - [`HttpRpcClient`] — `reqwest`-backed HTTP transport

pub mod error;
pub mod http;
pub mod request;
pub mod retry;
pub mod transport;

pub use error::TransportError;
pub use http::{HttpClientConfig, HttpRpcClient};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use retry::{RetryConfig, RetryPolicy};
pub use transport::RpcTransport;
