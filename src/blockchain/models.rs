// Raw RPC payload shapes and the pure normalizers that turn them into
// the canonical records in crate::models. Integer-like hex fields parse
// to native ints; wei-like magnitudes stay as strings.

use crate::models::{EvmBlockRecord, EvmTxRecord, SolanaSlotRecord, SolanaTxRecord};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct EvmBlockRpc {
    pub number: String,
    pub hash: String,
    #[serde(rename = "parentHash")]
    pub parent_hash: String,
    pub timestamp: String,
    pub miner: String,
    #[serde(rename = "gasUsed")]
    pub gas_used: String,
    #[serde(rename = "gasLimit")]
    pub gas_limit: String,
    #[serde(default)]
    pub transactions: Vec<EvmTxRpc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvmTxRpc {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub value: String,
    #[serde(rename = "gasPrice", default)]
    pub gas_price: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvmReceiptRpc {
    pub status: Option<String>,
    #[serde(rename = "gasUsed")]
    pub gas_used: Option<String>,
    #[serde(default)]
    pub logs: Vec<RawLog>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLog {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    #[serde(rename = "logIndex")]
    pub log_index: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaBlockRpc {
    #[serde(rename = "blockTime")]
    pub block_time: Option<i64>,
    pub blockhash: Option<String>,
    #[serde(rename = "previousBlockhash")]
    pub previous_blockhash: Option<String>,
    #[serde(default)]
    pub transactions: Vec<SolanaTxRpc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaTxRpc {
    pub transaction: SolanaTxBody,
    pub meta: Option<SolanaTxMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaTxBody {
    pub signatures: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaTxMeta {
    pub fee: Option<i64>,
    pub err: Option<Value>,
}

/// Parse a 0x-prefixed (or bare) hex quantity. Returns None on garbage
/// rather than panicking; callers decide the fallback.
pub fn parse_hex_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim_start_matches("0x");
    if trimmed.is_empty() {
        return Some(0);
    }
    i64::from_str_radix(trimmed, 16).ok()
}

pub fn normalize_evm_block(chain_id: &str, block: &EvmBlockRpc) -> EvmBlockRecord {
    EvmBlockRecord {
        chain_id: chain_id.to_string(),
        number: parse_hex_i64(&block.number).unwrap_or(0),
        hash: block.hash.clone(),
        parent_hash: block.parent_hash.clone(),
        timestamp: parse_hex_i64(&block.timestamp).unwrap_or(0),
        miner: block.miner.clone(),
        gas_used: parse_hex_i64(&block.gas_used).unwrap_or(0),
        gas_limit: parse_hex_i64(&block.gas_limit).unwrap_or(0),
        tx_count: block.transactions.len() as i64,
    }
}

/// A missing receipt degrades the record to null gas/status; the
/// transaction itself is never dropped.
pub fn normalize_evm_tx(
    chain_id: &str,
    block_number: i64,
    tx: &EvmTxRpc,
    receipt: Option<&EvmReceiptRpc>,
) -> EvmTxRecord {
    EvmTxRecord {
        chain_id: chain_id.to_string(),
        hash: tx.hash.clone(),
        block_number,
        from_addr: tx.from.to_lowercase(),
        to_addr: tx.to.as_ref().map(|t| t.to_lowercase()),
        value_wei: tx.value.clone(),
        gas_price: tx.gas_price.clone().unwrap_or_else(|| "0x0".to_string()),
        gas_used: receipt.and_then(|r| r.gas_used.clone()),
        status: receipt
            .and_then(|r| r.status.as_deref())
            .and_then(parse_hex_i64),
    }
}

pub fn normalize_solana_slot(chain_id: &str, slot: i64, block: &SolanaBlockRpc) -> SolanaSlotRecord {
    SolanaSlotRecord {
        chain_id: chain_id.to_string(),
        slot,
        block_time: block.block_time,
        blockhash: block.blockhash.clone(),
        parent_blockhash: block.previous_blockhash.clone(),
        tx_count: block.transactions.len() as i64,
    }
}

/// Skipped slots still get a row so the cursor can pass them.
pub fn empty_solana_slot(chain_id: &str, slot: i64) -> SolanaSlotRecord {
    SolanaSlotRecord {
        chain_id: chain_id.to_string(),
        slot,
        block_time: None,
        blockhash: None,
        parent_blockhash: None,
        tx_count: 0,
    }
}

pub fn normalize_solana_tx(chain_id: &str, slot: i64, tx: &SolanaTxRpc) -> Option<SolanaTxRecord> {
    let signature = tx.transaction.signatures.first()?.clone();
    Some(SolanaTxRecord {
        chain_id: chain_id.to_string(),
        signature,
        slot,
        fee: tx.meta.as_ref().and_then(|m| m.fee),
        status: tx
            .meta
            .as_ref()
            .map(|m| if m.err.is_some() { 0 } else { 1 }),
    })
}
