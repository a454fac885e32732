//! Scan cursor — the monitor's position in the chain.

use serde::{Deserialize, Serialize};

/// The highest block whose logs have been fully processed.
///
/// A cursor built from a configured start block is *fresh*: the start block
/// itself has not been scanned yet, so the first pass begins at it. Once the
/// cursor has advanced, every later pass begins at `last_processed + 1`.
///
/// The cursor never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCursor {
    last_processed: u64,
    fresh: bool,
}

impl ScanCursor {
    /// Create a cursor positioned at the configured start block.
    pub fn new(start_block: u64) -> Self {
        Self {
            last_processed: start_block,
            fresh: true,
        }
    }

    /// Create a cursor for a block that is known to be fully processed
    /// (e.g. loaded from a checkpoint).
    pub fn resume(last_processed: u64) -> Self {
        Self {
            last_processed,
            fresh: false,
        }
    }

    /// The last processed block (the start block while the cursor is fresh).
    pub fn last_processed(&self) -> u64 {
        self.last_processed
    }

    /// Returns `true` until the cursor has advanced for the first time.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// The first block the next pass should scan.
    pub fn next_block(&self) -> u64 {
        if self.fresh {
            self.last_processed
        } else {
            self.last_processed.saturating_add(1)
        }
    }

    /// Returns `true` if `head` covers blocks the cursor has not processed.
    pub fn is_behind(&self, head: u64) -> bool {
        if self.fresh {
            head >= self.last_processed
        } else {
            head > self.last_processed
        }
    }

    /// Advance the cursor to `block` once its sub-range has completed.
    ///
    /// Returns `false` and leaves the cursor untouched if `block` would move
    /// it backwards.
    pub fn advance(&mut self, block: u64) -> bool {
        if block < self.last_processed {
            return false;
        }
        self.last_processed = block;
        self.fresh = false;
        true
    }
}

impl std::fmt::Display for ScanCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.last_processed)?;
        if self.fresh {
            write!(f, " (fresh)")?;
        }
        Ok(())
    }
}
