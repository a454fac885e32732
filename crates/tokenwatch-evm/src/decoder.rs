//! `TokenCreatedDecoder` — raw log → [`DomainEvent`].
//!
//! Event shape:
//!
//! ```text
//! TokenCreated(address indexed token, string name, string symbol, uint256 totalSupply)
//!
//! topics[0] = keccak256("TokenCreated(address,string,string,uint256)")
//! topics[1] = token, left-padded to 32 bytes
//! data      = abi.encode(name, symbol, totalSupply)
//! ```

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::Address;

use tokenwatch_core::error::DecodeError;
use tokenwatch_core::event::{DomainEvent, LogPosition};
use tokenwatch_core::types::LogFilter;

use crate::fingerprint;
use crate::log::RawLog;

const EXPECTED_TOPICS: usize = 2;

/// Decoder for `TokenCreated` logs. Stateless apart from the cached
/// signature hash; cheap to clone.
#[derive(Debug, Clone)]
pub struct TokenCreatedDecoder {
    topic0: String,
    data_type: DynSolType,
}

impl Default for TokenCreatedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCreatedDecoder {
    pub fn new() -> Self {
        Self {
            topic0: fingerprint::token_created_topic(),
            data_type: DynSolType::Tuple(vec![
                DynSolType::String,
                DynSolType::String,
                DynSolType::Uint(256),
            ]),
        }
    }

    /// The signature hash expected in `topics[0]`.
    pub fn topic0(&self) -> &str {
        &self.topic0
    }

    /// The `eth_getLogs` filter selecting this event on `contract`.
    pub fn filter_for(&self, contract: impl Into<String>) -> LogFilter {
        LogFilter::new(contract, self.topic0.clone())
    }

    /// Decode one log into a [`DomainEvent`].
    pub fn decode(&self, log: &RawLog) -> Result<DomainEvent, DecodeError> {
        if log.topics.len() != EXPECTED_TOPICS {
            return Err(DecodeError::TopicCount {
                expected: EXPECTED_TOPICS,
                got: log.topics.len(),
            });
        }
        if !log.topics[0].eq_ignore_ascii_case(&self.topic0) {
            return Err(DecodeError::SignatureMismatch {
                expected: self.topic0.clone(),
                got: log.topics[0].clone(),
            });
        }

        let token_address = decode_address_topic(&log.topics[1])?;
        let (name, symbol, total_supply) = self.decode_data(&log.data)?;
        let position = position_of(log)?;

        Ok(DomainEvent {
            token_address,
            name,
            symbol,
            total_supply,
            position,
        })
    }

    fn decode_data(
        &self,
        data_hex: &str,
    ) -> Result<(String, String, alloy_primitives::U256), DecodeError> {
        let hex = data_hex.strip_prefix("0x").unwrap_or(data_hex);
        let bytes = hex::decode(hex).map_err(|e| DecodeError::InvalidData {
            reason: format!("invalid data hex: {e}"),
        })?;

        let decoded = self
            .data_type
            .abi_decode_params(&bytes)
            .map_err(|e| DecodeError::AbiDecodeFailed {
                reason: e.to_string(),
            })?;

        // The decoder ignores trailing bytes; the canonical encoding must span
        // the whole payload.
        let canonical_len = decoded.abi_encode_params().len();
        if canonical_len != bytes.len() {
            return Err(DecodeError::InvalidData {
                reason: format!(
                    "payload is {} bytes, expected {canonical_len}",
                    bytes.len()
                ),
            });
        }

        match decoded {
            DynSolValue::Tuple(values) => match values.as_slice() {
                [DynSolValue::String(name), DynSolValue::String(symbol), DynSolValue::Uint(supply, 256)] => {
                    Ok((name.clone(), symbol.clone(), *supply))
                }
                other => Err(DecodeError::AbiDecodeFailed {
                    reason: format!("unexpected field layout ({} values)", other.len()),
                }),
            },
            _ => Err(DecodeError::AbiDecodeFailed {
                reason: "data did not decode to a tuple".into(),
            }),
        }
    }
}

/// An indexed `address` is a 32-byte word whose upper 12 bytes are zero.
fn decode_address_topic(topic: &str) -> Result<String, DecodeError> {
    if !fingerprint::is_topic_hex(topic) {
        return Err(DecodeError::InvalidTopic {
            reason: format!("not a 32-byte word: {topic}"),
        });
    }
    let hex = topic.strip_prefix("0x").unwrap_or(topic);
    let bytes = hex::decode(hex).map_err(|e| DecodeError::InvalidTopic {
        reason: e.to_string(),
    })?;
    if bytes[..12].iter().any(|b| *b != 0) {
        return Err(DecodeError::InvalidTopic {
            reason: format!("address topic has non-zero padding: {topic}"),
        });
    }
    Ok(Address::from_slice(&bytes[12..]).to_checksum(None))
}

fn position_of(log: &RawLog) -> Result<LogPosition, DecodeError> {
    let missing = |field: &str| DecodeError::InvalidData {
        reason: format!("log has no {field} (pending?)"),
    };
    Ok(LogPosition {
        block_number: log.block_number_u64().ok_or_else(|| missing("block number"))?,
        tx_hash: log
            .transaction_hash
            .clone()
            .ok_or_else(|| missing("transaction hash"))?,
        log_index: log.log_index_u64().ok_or_else(|| missing("log index"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    const TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn token_topic() -> String {
        format!("0x{:0>64}", TOKEN.trim_start_matches("0x").to_lowercase())
    }

    fn data(name: &str, symbol: &str, supply: U256) -> String {
        let encoded = DynSolValue::Tuple(vec![
            DynSolValue::String(name.into()),
            DynSolValue::String(symbol.into()),
            DynSolValue::Uint(supply, 256),
        ])
        .abi_encode_params();
        format!("0x{}", hex::encode(encoded))
    }

    fn log(topics: Vec<String>, data: String) -> RawLog {
        RawLog {
            address: "0x1578e6b0da7048764ce14f7462567beb911b11f2".into(),
            topics,
            data,
            block_number: Some("0x3eaf75".into()),
            block_hash: Some(format!("0x{}", "11".repeat(32))),
            transaction_hash: Some(format!("0x{}", "22".repeat(32))),
            log_index: Some("0x2".into()),
            removed: Some(false),
        }
    }

    #[test]
    fn decodes_token_created() {
        let decoder = TokenCreatedDecoder::new();
        let raw = log(
            vec![decoder.topic0().to_string(), token_topic()],
            data("Foo", "FOO", U256::from(1000u64)),
        );
        let event = decoder.decode(&raw).unwrap();
        assert_eq!(event.name, "Foo");
        assert_eq!(event.symbol, "FOO");
        assert_eq!(event.total_supply, U256::from(1000u64));
        assert_eq!(event.token_address, TOKEN);
        assert_eq!(event.position.block_number, 0x3eaf75);
        assert_eq!(event.position.log_index, 2);
    }

    #[test]
    fn keeps_full_supply_precision() {
        let decoder = TokenCreatedDecoder::new();
        let supply = U256::from(10u64).pow(U256::from(30u64));
        let raw = log(
            vec![decoder.topic0().to_string(), token_topic()],
            data("Big", "BIG", supply),
        );
        let event = decoder.decode(&raw).unwrap();
        assert_eq!(event.total_supply.to_string(), "1000000000000000000000000000000");
    }

    #[test]
    fn topic0_comparison_ignores_case() {
        let decoder = TokenCreatedDecoder::new();
        let raw = log(
            vec![decoder.topic0().to_uppercase().replacen("0X", "0x", 1), token_topic()],
            data("Foo", "FOO", U256::from(1u64)),
        );
        assert!(decoder.decode(&raw).is_ok());
    }

    #[test]
    fn rejects_wrong_topic_count() {
        let decoder = TokenCreatedDecoder::new();
        let raw = log(vec![decoder.topic0().to_string()], data("A", "A", U256::ZERO));
        assert_eq!(
            decoder.decode(&raw),
            Err(DecodeError::TopicCount { expected: 2, got: 1 })
        );
    }

    #[test]
    fn rejects_other_event() {
        let decoder = TokenCreatedDecoder::new();
        let transfer = fingerprint::keccak256_signature("Transfer(address,address,uint256)");
        let raw = log(vec![transfer, token_topic()], data("A", "A", U256::ZERO));
        assert!(matches!(
            decoder.decode(&raw),
            Err(DecodeError::SignatureMismatch { .. })
        ));
    }

    #[test]
    fn rejects_dirty_address_padding() {
        let decoder = TokenCreatedDecoder::new();
        let dirty = format!("0x01{}", &token_topic()[4..]);
        let raw = log(vec![decoder.topic0().to_string(), dirty], data("A", "A", U256::ZERO));
        assert!(matches!(
            decoder.decode(&raw),
            Err(DecodeError::InvalidTopic { .. })
        ));
    }

    #[test]
    fn rejects_truncated_payload() {
        let decoder = TokenCreatedDecoder::new();
        let full = data("Foo", "FOO", U256::from(1000u64));
        let truncated = full[..full.len() - 64].to_string();
        let raw = log(vec![decoder.topic0().to_string(), token_topic()], truncated);
        assert!(matches!(
            decoder.decode(&raw),
            Err(DecodeError::AbiDecodeFailed { .. })
        ));
    }

    #[test]
    fn rejects_overlong_payload() {
        let decoder = TokenCreatedDecoder::new();
        let padded = format!("{}{}", data("Foo", "FOO", U256::from(1000u64)), "ff".repeat(64));
        let raw = log(vec![decoder.topic0().to_string(), token_topic()], padded);
        assert!(matches!(
            decoder.decode(&raw),
            Err(DecodeError::InvalidData { .. })
        ));
    }

    #[test]
    fn rejects_non_hex_payload() {
        let decoder = TokenCreatedDecoder::new();
        let raw = log(
            vec![decoder.topic0().to_string(), token_topic()],
            "0xnothex".into(),
        );
        assert!(matches!(
            decoder.decode(&raw),
            Err(DecodeError::InvalidData { .. })
        ));
    }

    #[test]
    fn rejects_pending_log() {
        let decoder = TokenCreatedDecoder::new();
        let mut raw = log(
            vec![decoder.topic0().to_string(), token_topic()],
            data("Foo", "FOO", U256::from(1u64)),
        );
        raw.block_number = None;
        assert!(matches!(
            decoder.decode(&raw),
            Err(DecodeError::InvalidData { .. })
        ));
    }

    #[test]
    fn filter_uses_signature_hash() {
        let decoder = TokenCreatedDecoder::new();
        let filter = decoder.filter_for("0x1578E6B0dA7048764ce14F7462567BEb911B11f2");
        assert_eq!(filter.topic0, fingerprint::token_created_topic());
    }
}
