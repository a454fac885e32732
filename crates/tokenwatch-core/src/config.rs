//! Monitor configuration.

use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Factory contract watched by default.
pub const DEFAULT_CONTRACT: &str = "0x1578E6B0dA7048764ce14F7462567BEb911B11f2";
/// First block scanned by default (the factory's deployment block).
pub const DEFAULT_START_BLOCK: u64 = 4_107_893;

/// Everything the scan loop and the dispatcher need, minus secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Contract whose events are monitored.
    #[serde(default = "default_contract")]
    pub contract_address: String,
    /// First block to scan.
    #[serde(default = "default_start_block")]
    pub start_block: u64,
    /// Optional last block to scan (bounded backfill). `None` = run forever.
    #[serde(default)]
    pub end_block: Option<u64>,
    /// Maximum `to - from` of a single `eth_getLogs` query.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
    /// Blocks to stay behind the reported head.
    #[serde(default)]
    pub confirmations: u64,
    /// Delay between poll iterations, and after a failed iteration (ms).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Minimum spacing between two notifications (ms).
    #[serde(default = "default_send_spacing_ms")]
    pub send_spacing_ms: u64,
    /// Maximum number of notification sends in flight at once.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight_sends: usize,
    /// How many recently dispatched log positions to remember.
    #[serde(default = "default_dedup_window")]
    pub dedup_window: usize,
    /// Block explorer base URL used for token links.
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,
}

fn default_contract() -> String { DEFAULT_CONTRACT.into() }
fn default_start_block() -> u64 { DEFAULT_START_BLOCK }
fn default_chunk_size() -> u64 { 5_000 }
fn default_poll_interval_ms() -> u64 { 10_000 }
fn default_send_spacing_ms() -> u64 { 5_000 }
fn default_max_in_flight() -> usize { 16 }
fn default_dedup_window() -> usize { 4_096 }
fn default_explorer_url() -> String { "https://etherscan.io".into() }

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            contract_address: default_contract(),
            start_block: default_start_block(),
            end_block: None,
            chunk_size: default_chunk_size(),
            confirmations: 0,
            poll_interval_ms: default_poll_interval_ms(),
            send_spacing_ms: default_send_spacing_ms(),
            max_in_flight_sends: default_max_in_flight(),
            dedup_window: default_dedup_window(),
            explorer_url: default_explorer_url(),
        }
    }
}

impl MonitorConfig {
    /// Check the configuration before the loop is started.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.contract()?;
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if let Some(end) = self.end_block {
            if end < self.start_block {
                return Err(ConfigError::EndBeforeStart {
                    start: self.start_block,
                    end,
                });
            }
        }
        Ok(())
    }

    /// The contract address, parsed.
    pub fn contract(&self) -> Result<Address, ConfigError> {
        Address::from_str(&self.contract_address)
            .map_err(|_| ConfigError::InvalidAddress(self.contract_address.clone()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn send_spacing(&self) -> Duration {
        Duration::from_millis(self.send_spacing_ms)
    }
}
