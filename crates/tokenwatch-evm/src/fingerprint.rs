//! Event signature hashing.
//!
//! `topics[0]` of an EVM log is the keccak256 hash of the event's canonical
//! signature, e.g.
//!   keccak256("Transfer(address,address,uint256)")
//!   → 0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef

use tiny_keccak::{Hasher, Keccak};

/// Canonical signature of the monitored event.
pub const TOKEN_CREATED_SIGNATURE: &str = "TokenCreated(address,string,string,uint256)";

/// Compute the keccak256 hash of an event signature, `0x`-prefixed lowercase hex.
pub fn keccak256_signature(signature: &str) -> String {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(signature.as_bytes());
    hasher.finalize(&mut output);
    format!("0x{}", hex::encode(output))
}

/// `topics[0]` of every `TokenCreated` log.
pub fn token_created_topic() -> String {
    keccak256_signature(TOKEN_CREATED_SIGNATURE)
}

/// Returns `true` if `topic` looks like a 32-byte hex word.
pub fn is_topic_hex(topic: &str) -> bool {
    let hex = topic.strip_prefix("0x").unwrap_or(topic);
    hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit())
}
