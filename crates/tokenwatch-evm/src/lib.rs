//! tokenwatch-evm — `TokenCreated` decoding, chunked log scanning and the
//! poll loop that drives them.

pub mod builder;
pub mod decoder;
pub mod fingerprint;
pub mod log;
pub mod poll_loop;
pub mod scanner;
pub mod source;

pub use builder::MonitorBuilder;
pub use decoder::TokenCreatedDecoder;
pub use fingerprint::{keccak256_signature, token_created_topic, TOKEN_CREATED_SIGNATURE};
pub use log::RawLog;
pub use poll_loop::{LoopState, LoopStats, PollLoop};
pub use scanner::{RangeScan, RangeScanner, ScannedChunk};
pub use source::{JsonRpcLedger, LedgerSource};
