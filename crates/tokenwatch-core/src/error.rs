//! Error types for the monitor pipeline.
//!
//! Each kind maps to one recovery policy: a [`DecodeError`] skips one log,
//! a [`QueryError`] sends the poll loop into backoff with the cursor
//! untouched, a [`NotifyError`] drops one message. Only [`ConfigError`] is
//! fatal, and only at startup.

use thiserror::Error;

/// A log did not match the expected event shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Expected {expected} topics, got {got}")]
    TopicCount { expected: usize, got: usize },

    #[error("Event signature mismatch: expected {expected}, got {got}")]
    SignatureMismatch { expected: String, got: String },

    #[error("Invalid topic: {reason}")]
    InvalidTopic { reason: String },

    #[error("Invalid data payload: {reason}")]
    InvalidData { reason: String },

    #[error("ABI decode failed: {reason}")]
    AbiDecodeFailed { reason: String },
}

/// The ledger source could not answer a head or log query.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error("Ledger source unreachable: {0}")]
    Unreachable(String),

    #[error("Rate limited by ledger source: {0}")]
    RateLimited(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl QueryError {
    /// Returns `true` when the source itself reported the failure (as
    /// opposed to the network or the response format).
    pub fn is_node_error(&self) -> bool {
        matches!(self, Self::Rpc { .. })
    }
}

/// A notification could not be delivered.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Channel rejected message (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("{0}")]
    Other(String),
}

/// A checkpoint could not be loaded or saved.
#[derive(Debug, Clone, Error)]
pub enum CheckpointError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// The monitor configuration is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid contract address '{0}'")]
    InvalidAddress(String),

    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("End block {end} is below start block {start}")]
    EndBeforeStart { start: u64, end: u64 },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}
