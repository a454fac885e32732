//! TokenWatch CLI — announce new tokens from a factory contract on Telegram.
//!
//! # Commands
//! ```text
//! tokenwatch run                 scan from the start block, then follow the head
//! tokenwatch check [--recent N]  verify settings and RPC access, optionally decode recent blocks
//! tokenwatch info                print the watched event and defaults
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tokenwatch_core::EventSink;
use tokenwatch_evm::{
    token_created_topic, JsonRpcLedger, LedgerSource, MonitorBuilder, RangeScanner,
    TOKEN_CREATED_SIGNATURE,
};
use tokenwatch_notify::{
    DispatcherConfig, LogNotifier, NotificationDispatcher, Notifier, TelegramNotifier,
};
use tokenwatch_rpc::HttpRpcClient;

mod logging;
mod settings;

use settings::Settings;

#[derive(Parser)]
#[command(
    name = "tokenwatch",
    about = "Watch a token factory for TokenCreated events and announce them on Telegram",
    long_about = "
TokenWatch scans a factory contract's TokenCreated logs in bounded block
chunks, then polls for new blocks and posts one Telegram message per token.

ENVIRONMENT VARIABLES (a .env file in the working directory is read first):
  TOKENWATCH_RPC_URL    JSON-RPC endpoint (FRAX_RPC is accepted too)
  TG_TOKEN              Telegram bot token; unset = log messages only
  TOKENWATCH_CHAT_ID    Telegram chat id
  RUST_LOG              log filter, e.g. info,tokenwatch_evm=debug
",
    version
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan and notify until interrupted (default)
    Run,

    /// Validate settings and reach the RPC endpoint
    Check {
        /// Also decode the last N blocks (no notifications are sent)
        #[arg(long)]
        recent: Option<u64>,
    },

    /// Show the watched event and default settings
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_tracing(&cli.settings.log_level, cli.settings.log_json);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cmd_run(&cli.settings).await,
        Commands::Check { recent } => cmd_check(&cli.settings, recent).await,
        Commands::Info => cmd_info(&cli.settings),
    }
}

// ─── Command implementations ─────────────────────────────────────────────────

fn ledger(settings: &Settings) -> Result<JsonRpcLedger<HttpRpcClient>> {
    let client = HttpRpcClient::default_for(settings.rpc_url()?)
        .context("failed to build HTTP client")?;
    Ok(JsonRpcLedger::new(client))
}

async fn cmd_run(settings: &Settings) -> Result<()> {
    let config = settings.monitor_config();
    config.validate().context("invalid configuration")?;

    let notifier: Arc<dyn Notifier> = match settings.telegram() {
        Some(tg) => Arc::new(TelegramNotifier::new(tg).context("failed to build Telegram client")?),
        None => {
            tracing::warn!("TG_TOKEN not set; notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };
    let dispatcher = NotificationDispatcher::new(notifier, DispatcherConfig::from(&config));
    let sink: Arc<dyn EventSink> = Arc::new(dispatcher.clone());

    let mut poll_loop = MonitorBuilder::from_config(config).build(ledger(settings)?, sink)?;

    let stats = poll_loop.run_until(shutdown_signal()).await;

    let sends = dispatcher.stats();
    tracing::info!(
        cursor = %poll_loop.cursor(),
        passes = stats.passes,
        events = stats.events,
        decode_errors = stats.decode_errors,
        query_errors = stats.query_errors,
        sent = sends.sent,
        failed = sends.failed,
        duplicates = sends.duplicates,
        "stopped"
    );
    Ok(())
}

async fn cmd_check(settings: &Settings, recent: Option<u64>) -> Result<()> {
    let config = settings.monitor_config();
    config.validate().context("invalid configuration")?;
    println!("Configuration:");
    println!("{}", serde_json::to_string_pretty(&config)?);
    println!(
        "Telegram:  {}",
        if settings.telegram().is_some() { "configured" } else { "not configured (dry run)" }
    );

    let ledger = ledger(settings)?;
    let head = ledger.current_head().await.context("eth_blockNumber failed")?;
    println!("RPC:       {} (head {head})", tokenwatch_rpc::RpcTransport::url(ledger.transport()));
    if head < config.start_block {
        println!("Note:      head is below the start block {}", config.start_block);
    } else {
        println!("Backlog:   {} blocks from start block", head - config.start_block + 1);
    }

    if let Some(n) = recent {
        let from = head.saturating_sub(n.saturating_sub(1)).max(config.start_block);
        let scanner = RangeScanner::new(ledger, config.contract_address.clone(), config.chunk_size);
        let mut scan = scanner.scan(from, head);
        let mut found = 0usize;
        while let Some(chunk) = scan.next_chunk().await {
            let chunk = chunk.with_context(|| format!("eth_getLogs failed from block {from}"))?;
            for event in &chunk.events {
                found += 1;
                println!(
                    "  block {:>10}  {}  {} ({})  supply {}",
                    event.position.block_number,
                    event.token_address,
                    event.name,
                    event.symbol,
                    event.total_supply
                );
            }
            if chunk.skipped > 0 {
                println!("  {} undecodable log(s) in {}", chunk.skipped, chunk.range);
            }
        }
        println!("Found {found} TokenCreated event(s) in [{from}, {head}]");
    }
    Ok(())
}

fn cmd_info(settings: &Settings) -> Result<()> {
    println!("TokenWatch v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Event:      {TOKEN_CREATED_SIGNATURE}");
    println!("Topic0:     {}", token_created_topic());
    println!("Contract:   {}", settings.contract);
    println!("Start:      block {}", settings.start_block);
    println!("Chunk:      {} blocks per eth_getLogs", settings.chunk_size);
    println!("Poll:       every {}s", settings.poll_interval_secs);
    println!("Spacing:    {}s between messages", settings.send_spacing_secs);
    println!("Explorer:   {}", settings.explorer_url);
    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("interrupt received"),
        Err(e) => {
            tracing::warn!(error = %e, "could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
