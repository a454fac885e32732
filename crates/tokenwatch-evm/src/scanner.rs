//! `RangeScanner` — chunked `eth_getLogs` over a block interval.
//!
//! `[from, to]` is split into sub-ranges with `to - from <= max_chunk_size`
//! (see [`BlockRange::chunks`]). Each sub-range is queried only when the caller asks for the next
//! chunk, so a consumer that stops early never issues the remaining queries.

use futures::Stream;

use tokenwatch_core::error::QueryError;
use tokenwatch_core::event::DomainEvent;
use tokenwatch_core::types::{BlockRange, ChunkedRange, LogFilter};

use crate::decoder::TokenCreatedDecoder;
use crate::source::LedgerSource;

/// The decoded contents of one completed sub-range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedChunk {
    pub range: BlockRange,
    /// Decoded events, in the order the source returned the logs.
    pub events: Vec<DomainEvent>,
    /// Logs that failed to decode.
    pub skipped: usize,
    /// Logs flagged `removed` by the node.
    pub removed: usize,
}

/// Scans block intervals for `TokenCreated` logs.
pub struct RangeScanner<S> {
    source: S,
    decoder: TokenCreatedDecoder,
    filter: LogFilter,
    max_chunk_size: u64,
}

impl<S: LedgerSource> RangeScanner<S> {
    /// Scanner for `TokenCreated` logs emitted by `contract`.
    pub fn new(source: S, contract: impl Into<String>, max_chunk_size: u64) -> Self {
        let decoder = TokenCreatedDecoder::new();
        let filter = decoder.filter_for(contract);
        Self {
            source,
            decoder,
            filter,
            max_chunk_size,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    pub fn max_chunk_size(&self) -> u64 {
        self.max_chunk_size
    }

    /// Lazily scan `[from, to]`. Empty when `from > to`.
    pub fn scan(&self, from: u64, to: u64) -> RangeScan<'_, S> {
        RangeScan {
            scanner: self,
            chunks: BlockRange::chunks(from, to, self.max_chunk_size),
            failed: false,
        }
    }

    async fn scan_chunk(&self, range: BlockRange) -> Result<ScannedChunk, QueryError> {
        let logs = self.source.query_logs(range, &self.filter).await?;
        tracing::debug!(from = range.from, to = range.to, logs = logs.len(), "fetched logs");

        let mut chunk = ScannedChunk {
            range,
            events: Vec::with_capacity(logs.len()),
            skipped: 0,
            removed: 0,
        };
        for log in &logs {
            if log.is_removed() {
                chunk.removed += 1;
                continue;
            }
            match self.decoder.decode(log) {
                Ok(event) => chunk.events.push(event),
                Err(e) => {
                    chunk.skipped += 1;
                    tracing::warn!(
                        block = ?log.block_number_u64(),
                        tx = log.transaction_hash.as_deref().unwrap_or("?"),
                        error = %e,
                        "skipping undecodable log"
                    );
                }
            }
        }
        Ok(chunk)
    }
}

/// One scan over an interval. Yields sub-ranges in ascending order.
///
/// A query failure is yielded once and ends the scan; the failed sub-range
/// and everything after it are left for the next scan.
pub struct RangeScan<'a, S> {
    scanner: &'a RangeScanner<S>,
    chunks: ChunkedRange,
    failed: bool,
}

impl<'a, S: LedgerSource> RangeScan<'a, S> {
    /// Query and decode the next sub-range. `None` when the scan is over.
    pub async fn next_chunk(&mut self) -> Option<Result<ScannedChunk, QueryError>> {
        if self.failed {
            return None;
        }
        let range = self.chunks.next()?;
        let result = self.scanner.scan_chunk(range).await;
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }

    /// Sub-ranges not yet queried.
    pub fn remaining(&self) -> usize {
        if self.failed {
            0
        } else {
            self.chunks.len()
        }
    }

    /// The same sequence as a [`Stream`].
    pub fn into_stream(self) -> impl Stream<Item = Result<ScannedChunk, QueryError>> + 'a {
        futures::stream::unfold(self, |mut scan| async move {
            let item = scan.next_chunk().await?;
            Some((item, scan))
        })
    }
}
