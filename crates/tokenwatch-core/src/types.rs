//! Block ranges, range chunking and the log filter.

use serde::{Deserialize, Serialize};

// ─── BlockRange ───────────────────────────────────────────────────────────────

/// An inclusive block interval `[from, to]` with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRange {
    pub from: u64,
    pub to: u64,
}

impl BlockRange {
    /// Create a range. Returns `None` when `from > to`.
    pub fn new(from: u64, to: u64) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    /// Number of blocks covered (always at least 1).
    pub fn block_count(&self) -> u64 {
        self.to - self.from + 1
    }

    /// Returns `true` if `block` lies inside the range.
    pub fn contains(&self, block: u64) -> bool {
        self.from <= block && block <= self.to
    }

    /// Split `[from, to]` into consecutive sub-ranges with
    /// `to - from <= max_span`. Empty when `from > to`.
    ///
    /// Sub-range ends are anchored at `from + k * max_span`: the first is
    /// `[from, from + max_span]`, each later one ends `max_span` blocks after
    /// the previous end. `(0, 100, 40)` yields `[0,40] [41,80] [81,100]`.
    pub fn chunks(from: u64, to: u64, max_span: u64) -> ChunkedRange {
        ChunkedRange {
            next: (from <= to).then_some(from),
            first: true,
            end: to,
            max_span,
        }
    }
}

impl std::fmt::Display for BlockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}

// ─── ChunkedRange ─────────────────────────────────────────────────────────────

/// Iterator over the sub-ranges of a larger interval, ascending and
/// contiguous. Produced by [`BlockRange::chunks`].
#[derive(Debug, Clone)]
pub struct ChunkedRange {
    next: Option<u64>,
    first: bool,
    end: u64,
    max_span: u64,
}

impl ChunkedRange {
    /// Blocks covered by every sub-range after the first.
    fn step(&self) -> u64 {
        self.max_span.max(1)
    }
}

impl Iterator for ChunkedRange {
    type Item = BlockRange;

    fn next(&mut self) -> Option<BlockRange> {
        let start = self.next?;
        let stop = if self.first {
            start.saturating_add(self.max_span)
        } else {
            start.saturating_add(self.step() - 1)
        }
        .min(self.end);
        self.first = false;
        self.next = if stop >= self.end { None } else { Some(stop + 1) };
        Some(BlockRange { from: start, to: stop })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let Some(start) = self.next else {
            return (0, Some(0));
        };
        let blocks = (self.end - start) as u128 + 1;
        let step = self.step() as u128;
        let n = if self.first {
            let head = self.max_span as u128 + 1;
            1 + blocks.saturating_sub(head).div_ceil(step)
        } else {
            blocks.div_ceil(step)
        };
        let n = usize::try_from(n).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl ExactSizeIterator for ChunkedRange {}

// ─── LogFilter ────────────────────────────────────────────────────────────────

/// Which logs to ask the ledger source for: one contract, one event topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    /// Contract address (`0x…`).
    pub address: String,
    /// Event signature hash expected in `topics[0]` (`0x…`).
    pub topic0: String,
}

impl LogFilter {
    pub fn new(address: impl Into<String>, topic0: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            topic0: topic0.into(),
        }
    }

    /// Returns `true` if `address` is the filtered contract (case-insensitive).
    pub fn matches_address(&self, address: &str) -> bool {
        self.address.eq_ignore_ascii_case(address)
    }

    /// Returns `true` if `topic0` is the filtered event signature.
    pub fn matches_topic0(&self, topic0: &str) -> bool {
        self.topic0.eq_ignore_ascii_case(topic0)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
