//! The `RpcTransport` trait.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Async JSON-RPC transport. Object-safe apart from [`RpcTransport::call`],
/// which is only available on sized implementors.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send one request and return the raw response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Endpoint identifier used in logs. Must not contain credentials.
    fn url(&self) -> &str;

    /// Call `method` and deserialize its result.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, TransportError>
    where
        Self: Sized,
    {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let resp = self.send(JsonRpcRequest::new(id, method, params)).await?;
        let result = resp.into_result().map_err(TransportError::Rpc)?;
        serde_json::from_value(result).map_err(TransportError::Deserialization)
    }
}
