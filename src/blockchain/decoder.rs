use crate::blockchain::models::{parse_hex_i64, RawLog};
use crate::models::TransferRecord;

/// keccak256("Transfer(address,address,uint256)") — topic[0] of every
/// ERC20 Transfer log.
pub const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// Decode one receipt log into a transfer, or None if it is not an
/// ERC20 Transfer. Non-matching logs are skipped by design, not errors.
///
/// topics[1] and topics[2] are 32-byte left-padded values; the address
/// is the low 20 bytes (hex chars 26..66 after the 0x prefix).
pub fn decode_transfer(
    chain_id: &str,
    tx_hash: &str,
    block_number: i64,
    log: &RawLog,
) -> Option<TransferRecord> {
    if log.topics.len() < 3 {
        return None;
    }
    if !log.topics[0].eq_ignore_ascii_case(TRANSFER_TOPIC) {
        return None;
    }

    let from_addr = topic_to_address(&log.topics[1])?;
    let to_addr = topic_to_address(&log.topics[2])?;
    let value = if log.data.is_empty() {
        "0x".to_string()
    } else {
        log.data.clone()
    };

    Some(TransferRecord {
        chain_id: chain_id.to_string(),
        tx_hash: tx_hash.to_string(),
        log_index: parse_hex_i64(&log.log_index).unwrap_or(0),
        token_address: log.address.to_lowercase(),
        from_addr,
        to_addr,
        value,
        block_number,
    })
}

fn topic_to_address(topic: &str) -> Option<String> {
    let hex = topic.strip_prefix("0x").unwrap_or(topic);
    if hex.len() != 64 {
        return None;
    }
    Some(format!("0x{}", hex[24..].to_lowercase()))
}
