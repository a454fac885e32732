//! In-memory ledger and log builders shared by the behaviour tests.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::U256;
use async_trait::async_trait;

use tokenwatch_core::error::QueryError;
use tokenwatch_core::types::{BlockRange, LogFilter};
use tokenwatch_evm::{token_created_topic, LedgerSource, RawLog};

pub const CONTRACT: &str = "0x1578E6B0dA7048764ce14F7462567BEb911B11f2";

/// A chain held in memory: a scripted head sequence plus a fixed log set.
pub struct MockLedger {
    heads: Mutex<VecDeque<u64>>,
    logs: Vec<RawLog>,
    queries: Mutex<Vec<BlockRange>>,
    /// `from` bounds whose next query fails once.
    fail_once: Mutex<HashSet<u64>>,
}

impl MockLedger {
    pub fn new(heads: Vec<u64>, logs: Vec<RawLog>) -> Self {
        Self {
            heads: Mutex::new(heads.into()),
            logs,
            queries: Mutex::new(vec![]),
            fail_once: Mutex::new(HashSet::new()),
        }
    }

    /// Make the next query starting at `from` fail.
    pub fn fail_once_at(self, from: u64) -> Self {
        self.fail_once.lock().unwrap().insert(from);
        self
    }

    pub fn queries(&self) -> Vec<BlockRange> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerSource for MockLedger {
    async fn current_head(&self) -> Result<u64, QueryError> {
        let mut heads = self.heads.lock().unwrap();
        let head = if heads.len() > 1 { heads.pop_front() } else { heads.front().copied() };
        head.ok_or_else(|| QueryError::Unreachable("no head scripted".into()))
    }

    async fn query_logs(
        &self,
        range: BlockRange,
        filter: &LogFilter,
    ) -> Result<Vec<RawLog>, QueryError> {
        self.queries.lock().unwrap().push(range);
        if self.fail_once.lock().unwrap().remove(&range.from) {
            return Err(QueryError::Unreachable("connection reset by peer".into()));
        }
        Ok(self
            .logs
            .iter()
            .filter(|log| {
                log.block_number_u64().is_some_and(|b| range.contains(b))
                    && filter.matches_address(&log.address)
                    && log.topics.first().is_some_and(|t| filter.matches_topic0(t))
            })
            .cloned()
            .collect())
    }
}

/// ABI-encoded `(name, symbol, supply)` as `0x…` hex.
pub fn encode_data(name: &str, symbol: &str, supply: u64) -> String {
    let encoded = DynSolValue::Tuple(vec![
        DynSolValue::String(name.into()),
        DynSolValue::String(symbol.into()),
        DynSolValue::Uint(U256::from(supply), 256),
    ])
    .abi_encode_params();
    format!("0x{}", hex::encode(encoded))
}

/// A well-formed `TokenCreated` log at `block`, token address derived from `seed`.
pub fn token_log(block: u64, log_index: u64, seed: u8, name: &str, symbol: &str, supply: u64) -> RawLog {
    RawLog {
        address: CONTRACT.to_lowercase(),
        topics: vec![
            token_created_topic(),
            format!("0x{}{}", "00".repeat(12), hex::encode([seed; 20])),
        ],
        data: encode_data(name, symbol, supply),
        block_number: Some(format!("{block:#x}")),
        block_hash: Some(format!("0x{:064x}", block)),
        transaction_hash: Some(format!("0x{:062x}{:02x}", block, log_index)),
        log_index: Some(format!("{log_index:#x}")),
        removed: Some(false),
    }
}

/// A `TokenCreated` log whose payload has been cut short.
pub fn truncated_log(block: u64, log_index: u64) -> RawLog {
    let mut log = token_log(block, log_index, 0xee, "Broken", "BRK", 1);
    let keep = log.data.len() - 64;
    log.data.truncate(keep);
    log
}
