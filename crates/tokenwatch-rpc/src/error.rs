//! Transport-level error types.

use thiserror::Error;

use crate::request::JsonRpcError;

/// JSON-RPC error codes providers use for throttling.
const RATE_LIMIT_CODES: [i64; 2] = [-32005, 429];

/// Errors that can occur while talking to a JSON-RPC endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, reset, TLS failure, non-2xx status…
    #[error("HTTP error: {0}")]
    Http(String),

    /// HTTP 429 from the endpoint.
    #[error("Rate limit exceeded ({url})")]
    RateLimited { url: String },

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// No response within the configured timeout.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The response body or result could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl TransportError {
    /// Returns `true` if the error is transient and the request may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// Returns `true` if the node (or the endpoint) asked us to slow down.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Rpc(err) => RATE_LIMIT_CODES.contains(&err.code),
            _ => false,
        }
    }
}
