//! Checkpoint seam — where the poll loop reports progress.
//!
//! After every completed sub-range the loop hands its cursor to a
//! [`CheckpointStore`]. On startup a saved checkpoint (if any) takes
//! precedence over the configured start block. Only the in-memory store
//! ships, so a restarted process replays from the start block.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CheckpointError;

/// A saved scan position for one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Monitored contract address (`0x…`).
    pub contract: String,
    /// Last fully processed block.
    pub block_number: u64,
    /// Unix timestamp of when this checkpoint was saved.
    pub updated_at: i64,
}

impl Checkpoint {
    pub fn now(contract: impl Into<String>, block_number: u64) -> Self {
        Self {
            contract: contract.into(),
            block_number,
            updated_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Storage for checkpoints.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Load the latest checkpoint for a contract.
    async fn load(&self, contract: &str) -> Result<Option<Checkpoint>, CheckpointError>;

    /// Save (upsert) a checkpoint.
    async fn save(&self, checkpoint: Checkpoint) -> Result<(), CheckpointError>;
}

/// Process-local checkpoint store. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    data: Mutex<HashMap<String, Checkpoint>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(contract: &str) -> String {
        contract.to_ascii_lowercase()
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn load(&self, contract: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        let data = self.data.lock().map_err(|e| CheckpointError::Storage(e.to_string()))?;
        Ok(data.get(&Self::key(contract)).cloned())
    }

    async fn save(&self, checkpoint: Checkpoint) -> Result<(), CheckpointError> {
        let mut data = self.data.lock().map_err(|e| CheckpointError::Storage(e.to_string()))?;
        data.insert(Self::key(&checkpoint.contract), checkpoint);
        Ok(())
    }
}
