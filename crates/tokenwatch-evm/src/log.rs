//! The raw `eth_getLogs` record.

use serde::{Deserialize, Serialize};

/// A raw EVM log as returned by `eth_getLogs`.
///
/// Position fields are `null` for pending logs, hence the `Option`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub log_index: Option<String>,
    #[serde(default)]
    pub removed: Option<bool>,
}

impl RawLog {
    /// The block number, if the log is mined and the field parses.
    pub fn block_number_u64(&self) -> Option<u64> {
        self.block_number.as_deref().and_then(parse_hex_u64)
    }

    /// The log index within its block.
    pub fn log_index_u64(&self) -> Option<u64> {
        self.log_index.as_deref().and_then(parse_hex_u64)
    }

    /// Returns `true` if this log was removed by a reorg.
    pub fn is_removed(&self) -> bool {
        self.removed.unwrap_or(false)
    }
}

/// Parse a hex quantity (with or without `0x`) into a u64.
pub fn parse_hex_u64(s: &str) -> Option<u64> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() {
        return None;
    }
    u64::from_str_radix(s, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_u64_basic() {
        assert_eq!(parse_hex_u64("0x1"), Some(1));
        assert_eq!(parse_hex_u64("0xff"), Some(255));
        assert_eq!(parse_hex_u64("1234"), Some(0x1234));
        assert_eq!(parse_hex_u64("0x"), None);
        assert_eq!(parse_hex_u64("0xzz"), None);
    }

    #[test]
    fn deserializes_node_response() {
        let raw = r#"{
            "address": "0x1578e6b0da7048764ce14f7462567beb911b11f2",
            "topics": ["0xaa", "0xbb"],
            "data": "0x",
            "blockNumber": "0x12a05f200",
            "blockHash": "0x01",
            "transactionHash": "0x02",
            "transactionIndex": "0x0",
            "logIndex": "0x5",
            "removed": false
        }"#;
        let log: RawLog = serde_json::from_str(raw).unwrap();
        assert_eq!(log.block_number_u64(), Some(5_000_000_000));
        assert_eq!(log.log_index_u64(), Some(5));
        assert_eq!(log.transaction_hash.as_deref(), Some("0x02"));
        assert!(!log.is_removed());
    }

    #[test]
    fn pending_log_has_no_position() {
        let raw = r#"{"address":"0x0","topics":[],"data":"0x","blockNumber":null,"logIndex":null}"#;
        let log: RawLog = serde_json::from_str(raw).unwrap();
        assert_eq!(log.block_number_u64(), None);
        assert_eq!(log.log_index_u64(), None);
        assert!(!log.is_removed());
    }
}
