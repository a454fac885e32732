//! The decoded `TokenCreated` event.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Where a log sits in the chain. Used for ordering, logging and duplicate
/// suppression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogPosition {
    /// Block number.
    pub block_number: u64,
    /// Transaction hash (`0x…`).
    pub tx_hash: String,
    /// Log index within the block.
    pub log_index: u64,
}

impl std::fmt::Display for LogPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}@{}", self.tx_hash, self.log_index, self.block_number)
    }
}

/// A newly created token, as announced by the monitored factory contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    /// EIP-55 checksummed address of the created token.
    pub token_address: String,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Total supply in base units (full 256-bit precision).
    pub total_supply: U256,
    /// Position of the originating log.
    pub position: LogPosition,
}
