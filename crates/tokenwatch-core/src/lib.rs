//! tokenwatch-core — shared types for the TokenWatch log monitor.
//!
//! # Architecture
//!
//! ```text
//! PollLoop ──► RangeScanner ──► EventDecoder ──► NotificationDispatcher ──► Notifier
//!    │              │
//!    │              └── LedgerSource (eth_blockNumber / eth_getLogs)
//!    ├── ScanCursor       (last processed block)
//!    └── CheckpointStore  (optional progress sink)
//! ```
//!
//! This crate holds the pieces every other crate agrees on: block ranges and
//! their chunking, the scan cursor, the decoded domain event, the error
//! enums and the monitor configuration.

pub mod checkpoint;
pub mod config;
pub mod cursor;
pub mod error;
pub mod event;
pub mod sink;
pub mod types;

pub use checkpoint::{Checkpoint, CheckpointStore, MemoryCheckpointStore};
pub use config::MonitorConfig;
pub use cursor::ScanCursor;
pub use error::{CheckpointError, ConfigError, DecodeError, NotifyError, QueryError};
pub use event::{DomainEvent, LogPosition};
pub use sink::{CollectingSink, EventSink};
pub use types::{BlockRange, ChunkedRange, LogFilter};
