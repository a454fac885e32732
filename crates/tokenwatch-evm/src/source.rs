//! The ledger source — head and log queries.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use tokenwatch_core::error::QueryError;
use tokenwatch_core::types::{BlockRange, LogFilter};
use tokenwatch_rpc::{RpcTransport, TransportError};

use crate::log::{parse_hex_u64, RawLog};

/// Read access to the chain: the current head and the logs of a range.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// The latest block number.
    async fn current_head(&self) -> Result<u64, QueryError>;

    /// All logs in `range` (inclusive) matching `filter`, in chain order.
    async fn query_logs(
        &self,
        range: BlockRange,
        filter: &LogFilter,
    ) -> Result<Vec<RawLog>, QueryError>;
}

#[async_trait]
impl<T: LedgerSource + ?Sized> LedgerSource for Arc<T> {
    async fn current_head(&self) -> Result<u64, QueryError> {
        (**self).current_head().await
    }

    async fn query_logs(
        &self,
        range: BlockRange,
        filter: &LogFilter,
    ) -> Result<Vec<RawLog>, QueryError> {
        (**self).query_logs(range, filter).await
    }
}

/// [`LedgerSource`] over a JSON-RPC transport (`eth_blockNumber`, `eth_getLogs`).
pub struct JsonRpcLedger<T> {
    transport: T,
}

impl<T: RpcTransport> JsonRpcLedger<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<T: RpcTransport> LedgerSource for JsonRpcLedger<T> {
    async fn current_head(&self) -> Result<u64, QueryError> {
        let hex: String = self
            .transport
            .call("eth_blockNumber", vec![])
            .await
            .map_err(query_error)?;
        parse_hex_u64(&hex)
            .ok_or_else(|| QueryError::InvalidResponse(format!("bad block number: {hex}")))
    }

    async fn query_logs(
        &self,
        range: BlockRange,
        filter: &LogFilter,
    ) -> Result<Vec<RawLog>, QueryError> {
        let params = json!({
            "fromBlock": format!("{:#x}", range.from),
            "toBlock": format!("{:#x}", range.to),
            "address": filter.address,
            "topics": [filter.topic0],
        });
        tracing::debug!(from = range.from, to = range.to, url = %self.transport.url(), "eth_getLogs");
        self.transport
            .call("eth_getLogs", vec![params])
            .await
            .map_err(query_error)
    }
}

/// Map a transport failure onto the error the poll loop backs off on.
pub fn query_error(err: TransportError) -> QueryError {
    if err.is_rate_limit() {
        return QueryError::RateLimited(err.to_string());
    }
    match err {
        TransportError::Rpc(e) => QueryError::Rpc {
            code: e.code,
            message: e.message,
        },
        TransportError::Deserialization(e) => QueryError::InvalidResponse(e.to_string()),
        other @ (TransportError::Http(_)
        | TransportError::Timeout { .. }
        | TransportError::RateLimited { .. }) => QueryError::Unreachable(other.to_string()),
    }
}
