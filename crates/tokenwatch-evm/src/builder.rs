//! Fluent builder for the poll loop.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokenwatch_core::CollectingSink;
//! use tokenwatch_evm::{JsonRpcLedger, MonitorBuilder};
//! use tokenwatch_rpc::HttpRpcClient;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ledger = JsonRpcLedger::new(HttpRpcClient::default_for("https://rpc.frax.com")?);
//! let poll_loop = MonitorBuilder::new()
//!     .contract("0x1578E6B0dA7048764ce14F7462567BEb911B11f2")
//!     .start_block(4_107_893)
//!     .chunk_size(5_000)
//!     .poll_interval_ms(10_000)
//!     .build(ledger, Arc::new(CollectingSink::new()))?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokenwatch_core::checkpoint::CheckpointStore;
use tokenwatch_core::config::MonitorConfig;
use tokenwatch_core::error::ConfigError;
use tokenwatch_core::sink::EventSink;

use crate::poll_loop::PollLoop;
use crate::source::LedgerSource;

/// Fluent builder for [`MonitorConfig`] and [`PollLoop`].
#[derive(Default)]
pub struct MonitorBuilder {
    config: MonitorConfig,
    checkpoints: Option<Arc<dyn CheckpointStore>>,
}

impl MonitorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: MonitorConfig) -> Self {
        Self {
            config,
            checkpoints: None,
        }
    }

    /// Set the monitored contract address.
    pub fn contract(mut self, address: impl Into<String>) -> Self {
        self.config.contract_address = address.into();
        self
    }

    /// Set the first block to scan.
    pub fn start_block(mut self, block: u64) -> Self {
        self.config.start_block = block;
        self
    }

    /// Stop after this block (bounded backfill).
    pub fn end_block(mut self, block: u64) -> Self {
        self.config.end_block = Some(block);
        self
    }

    /// Set the maximum `to - from` of one `eth_getLogs` query.
    pub fn chunk_size(mut self, size: u64) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Blocks to stay behind the head.
    pub fn confirmations(mut self, depth: u64) -> Self {
        self.config.confirmations = depth;
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    /// Use `store` instead of the in-memory checkpoint store.
    pub fn checkpoint_store(mut self, store: Arc<dyn CheckpointStore>) -> Self {
        self.checkpoints = Some(store);
        self
    }

    /// Build the [`MonitorConfig`] without validating it.
    pub fn build_config(self) -> MonitorConfig {
        self.config
    }

    /// Validate the configuration and build the loop.
    pub fn build<S: LedgerSource>(
        self,
        source: S,
        sink: Arc<dyn EventSink>,
    ) -> Result<PollLoop<S>, ConfigError> {
        self.config.validate()?;
        let poll_loop = PollLoop::new(source, sink, &self.config);
        Ok(match self.checkpoints {
            Some(store) => poll_loop.with_checkpoint_store(store),
            None => poll_loop,
        })
    }
}
