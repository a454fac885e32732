//! The poll loop — drives catch-up passes from the scan cursor to the head.
//!
//! ```text
//!            head > cursor                 pass complete
//!   Idle ───────────────────► CatchingUp ───────────────► Idle
//!    ▲                            │
//!    │       poll interval        │ head read / query failed
//!    └──────────────────────── Backoff
//! ```
//!
//! A pass captures the head once, scans `[cursor.next_block(), head]` in
//! sub-ranges and advances the cursor after every sub-range whose events
//! have been handed to the sink. Errors never escape [`PollLoop::run`]; they
//! end the pass, leave the cursor where the last completed sub-range put it,
//! and the next tick retries from there.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use tokenwatch_core::checkpoint::{Checkpoint, CheckpointStore, MemoryCheckpointStore};
use tokenwatch_core::config::MonitorConfig;
use tokenwatch_core::cursor::ScanCursor;
use tokenwatch_core::error::QueryError;
use tokenwatch_core::sink::EventSink;

use crate::scanner::RangeScanner;
use crate::source::LedgerSource;

/// Where the loop is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoopState {
    Idle,
    CatchingUp,
    Backoff,
}

/// Counters since the loop was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    /// Catch-up passes started.
    pub passes: u64,
    /// Sub-ranges completed.
    pub sub_ranges: u64,
    /// Events handed to the sink.
    pub events: u64,
    pub decode_errors: u64,
    pub removed_logs: u64,
    /// Iterations that ended in Backoff.
    pub query_errors: u64,
    pub checkpoint_errors: u64,
}

/// Owns the scan cursor and runs the scanner against the chain head.
pub struct PollLoop<S> {
    scanner: RangeScanner<S>,
    sink: Arc<dyn EventSink>,
    checkpoints: Arc<dyn CheckpointStore>,
    cursor: ScanCursor,
    state: LoopState,
    stats: LoopStats,
    contract: String,
    start_block: u64,
    end_block: Option<u64>,
    confirmations: u64,
    poll_interval: Duration,
}

impl<S: LedgerSource> PollLoop<S> {
    pub fn new(source: S, sink: Arc<dyn EventSink>, config: &MonitorConfig) -> Self {
        Self {
            scanner: RangeScanner::new(source, config.contract_address.clone(), config.chunk_size),
            sink,
            checkpoints: Arc::new(MemoryCheckpointStore::new()),
            cursor: ScanCursor::new(config.start_block),
            state: LoopState::CatchingUp,
            stats: LoopStats::default(),
            contract: config.contract_address.clone(),
            start_block: config.start_block,
            end_block: config.end_block,
            confirmations: config.confirmations,
            poll_interval: config.poll_interval(),
        }
    }

    /// Replace the default in-memory checkpoint store.
    pub fn with_checkpoint_store(mut self, store: Arc<dyn CheckpointStore>) -> Self {
        self.checkpoints = store;
        self
    }

    pub fn cursor(&self) -> ScanCursor {
        self.cursor
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn scanner(&self) -> &RangeScanner<S> {
        &self.scanner
    }

    /// Returns `true` once a configured end block has been processed.
    pub fn is_finished(&self) -> bool {
        self.end_block
            .is_some_and(|end| !self.cursor.is_behind(end))
    }

    /// Move the cursor to a saved checkpoint, if one exists past the start
    /// block. Returns `true` if the cursor moved.
    pub async fn restore_checkpoint(&mut self) -> bool {
        match self.checkpoints.load(&self.contract).await {
            Ok(Some(cp)) if cp.block_number >= self.start_block => {
                tracing::info!(block = cp.block_number, "resuming from checkpoint");
                self.cursor = ScanCursor::resume(cp.block_number);
                true
            }
            Ok(_) => false,
            Err(e) => {
                self.stats.checkpoint_errors += 1;
                tracing::warn!(error = %e, "could not load checkpoint; starting from start block");
                false
            }
        }
    }

    /// Run one iteration without sleeping. Returns the resulting state:
    /// `Idle` if the cursor caught up (or had nothing to do), `Backoff` if
    /// the iteration failed.
    pub async fn tick(&mut self) -> LoopState {
        self.state = match self.catch_up().await {
            Ok(()) => LoopState::Idle,
            Err(e) => {
                self.stats.query_errors += 1;
                tracing::warn!(
                    error = %e,
                    cursor = %self.cursor,
                    retry_in_ms = self.poll_interval.as_millis() as u64,
                    "poll iteration failed; backing off"
                );
                LoopState::Backoff
            }
        };
        self.state
    }

    /// Poll forever, or until a configured end block is reached.
    pub async fn run(&mut self) -> LoopStats {
        self.run_until(std::future::pending()).await
    }

    /// Poll until `shutdown` resolves or a configured end block is reached,
    /// then wait for the sink to drain.
    pub async fn run_until<F>(&mut self, shutdown: F) -> LoopStats
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        self.restore_checkpoint().await;
        tracing::info!(
            contract = %self.contract,
            cursor = %self.cursor,
            chunk_size = self.scanner.max_chunk_size(),
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "poll loop started"
        );

        loop {
            let state = tokio::select! {
                _ = &mut shutdown => break,
                state = self.tick() => state,
            };

            if self.is_finished() {
                tracing::info!(cursor = %self.cursor, "end block reached");
                break;
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
            if state == LoopState::Backoff {
                self.state = LoopState::Idle;
            }
        }

        tracing::info!(cursor = %self.cursor, "poll loop stopping; draining notifications");
        self.sink.drain().await;
        self.stats
    }

    /// The highest block the next pass may scan.
    fn target(&self, head: u64) -> u64 {
        let confirmed = head.saturating_sub(self.confirmations);
        match self.end_block {
            Some(end) => confirmed.min(end),
            None => confirmed,
        }
    }

    async fn catch_up(&mut self) -> Result<(), QueryError> {
        let head = self.scanner.source().current_head().await?;
        let target = self.target(head);
        if !self.cursor.is_behind(target) {
            tracing::debug!(head, cursor = %self.cursor, "no new blocks");
            return Ok(());
        }

        self.state = LoopState::CatchingUp;
        self.stats.passes += 1;
        let from = self.cursor.next_block();
        tracing::info!(from, to = target, head, "catch-up pass");

        let mut scan = self.scanner.scan(from, target);
        while let Some(result) = scan.next_chunk().await {
            let chunk = result?;
            let events = chunk.events.len();
            for event in chunk.events {
                self.sink.dispatch(event);
            }

            self.stats.sub_ranges += 1;
            self.stats.events += events as u64;
            self.stats.decode_errors += chunk.skipped as u64;
            self.stats.removed_logs += chunk.removed as u64;
            self.cursor.advance(chunk.range.to);

            if let Err(e) = self
                .checkpoints
                .save(Checkpoint::now(self.contract.clone(), chunk.range.to))
                .await
            {
                self.stats.checkpoint_errors += 1;
                tracing::warn!(block = chunk.range.to, error = %e, "checkpoint save failed");
            }

            tracing::info!(
                from = chunk.range.from,
                to = chunk.range.to,
                events,
                skipped = chunk.skipped,
                cursor = %self.cursor,
                "sub-range complete"
            );
        }
        Ok(())
    }
}
