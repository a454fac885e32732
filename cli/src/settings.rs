//! Command-line / environment settings.
//!
//! Every flag can also come from the environment (or a `.env` file loaded
//! before parsing).

use anyhow::{anyhow, Result};
use clap::Args;

use tokenwatch_core::config::{MonitorConfig, DEFAULT_CONTRACT, DEFAULT_START_BLOCK};
use tokenwatch_notify::{TelegramConfig, DEFAULT_CHAT_ID, DEFAULT_EXPLORER_URL};

#[derive(Args, Clone)]
pub struct Settings {
    /// JSON-RPC endpoint of the chain to watch
    #[arg(long, env = "TOKENWATCH_RPC_URL", hide_env_values = true, global = true)]
    pub rpc_url: Option<String>,

    /// Legacy name for --rpc-url
    #[arg(long, env = "FRAX_RPC", hide = true, hide_env_values = true, global = true)]
    pub frax_rpc: Option<String>,

    /// Factory contract emitting TokenCreated
    #[arg(long, env = "TOKENWATCH_CONTRACT", default_value = DEFAULT_CONTRACT, global = true)]
    pub contract: String,

    /// First block to scan
    #[arg(long, env = "TOKENWATCH_START_BLOCK", default_value_t = DEFAULT_START_BLOCK, global = true)]
    pub start_block: u64,

    /// Stop after this block (bounded backfill)
    #[arg(long, env = "TOKENWATCH_END_BLOCK", global = true)]
    pub end_block: Option<u64>,

    /// Seconds between polls, and after a failed poll
    #[arg(long, env = "TOKENWATCH_POLL_INTERVAL_SECS", default_value_t = 10, global = true)]
    pub poll_interval_secs: u64,

    /// Maximum to-from span of one eth_getLogs query
    #[arg(long, env = "TOKENWATCH_CHUNK_SIZE", default_value_t = 5_000, global = true)]
    pub chunk_size: u64,

    /// Blocks to stay behind the chain head
    #[arg(long, env = "TOKENWATCH_CONFIRMATIONS", default_value_t = 0, global = true)]
    pub confirmations: u64,

    /// Minimum seconds between two Telegram messages
    #[arg(long, env = "TOKENWATCH_SEND_SPACING_SECS", default_value_t = 5, global = true)]
    pub send_spacing_secs: u64,

    /// Block explorer used for token links
    #[arg(long, env = "TOKENWATCH_EXPLORER_URL", default_value = DEFAULT_EXPLORER_URL, global = true)]
    pub explorer_url: String,

    /// Telegram bot token; without it messages are only logged
    #[arg(long, env = "TG_TOKEN", hide_env_values = true, global = true)]
    pub tg_token: Option<String>,

    /// Telegram chat to notify
    #[arg(long, env = "TOKENWATCH_CHAT_ID", default_value = DEFAULT_CHAT_ID, allow_hyphen_values = true, global = true)]
    pub chat_id: String,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Emit JSON logs
    #[arg(long, env = "TOKENWATCH_LOG_JSON", global = true)]
    pub log_json: bool,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("rpc_url", &self.rpc_url.as_ref().map(|_| "<set>"))
            .field("contract", &self.contract)
            .field("start_block", &self.start_block)
            .field("end_block", &self.end_block)
            .field("tg_token", &self.tg_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl Settings {
    /// The RPC endpoint, preferring `--rpc-url` over the legacy variable.
    pub fn rpc_url(&self) -> Result<&str> {
        self.rpc_url
            .as_deref()
            .or(self.frax_rpc.as_deref())
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow!("no RPC endpoint: set --rpc-url or TOKENWATCH_RPC_URL"))
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            contract_address: self.contract.clone(),
            start_block: self.start_block,
            end_block: self.end_block,
            chunk_size: self.chunk_size,
            confirmations: self.confirmations,
            poll_interval_ms: self.poll_interval_secs.saturating_mul(1_000),
            send_spacing_ms: self.send_spacing_secs.saturating_mul(1_000),
            explorer_url: self.explorer_url.clone(),
            ..MonitorConfig::default()
        }
    }

    /// Telegram settings, or `None` for a dry run.
    pub fn telegram(&self) -> Option<TelegramConfig> {
        let token = self.tg_token.as_deref().filter(|t| !t.is_empty())?;
        Some(TelegramConfig::new(token, self.chat_id.clone()))
    }
}
