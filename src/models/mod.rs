// Canonical, chain-tagged records the indexer persists and serves.
// Raw RPC payload shapes live in blockchain::models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainFamily {
    #[serde(rename = "EVM")]
    Evm,
    #[serde(rename = "SOLANA")]
    Solana,
}

impl ChainFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainFamily::Evm => "EVM",
            ChainFamily::Solana => "SOLANA",
        }
    }
}

/// Per-chain descriptor, loaded once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub family: ChainFamily,
    pub name: String,
    #[serde(rename = "rpcUrl")]
    pub rpc_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvmBlockRecord {
    pub chain_id: String,
    pub number: i64,
    pub hash: String,
    pub parent_hash: String,
    pub timestamp: i64,
    pub miner: String,
    pub gas_used: i64,
    pub gas_limit: i64,
    pub tx_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvmTxRecord {
    pub chain_id: String,
    pub hash: String,
    pub block_number: i64,
    pub from_addr: String,
    pub to_addr: Option<String>,
    /// Wei amount, kept as the RPC hex string to avoid precision loss.
    pub value_wei: String,
    pub gas_price: String,
    pub gas_used: Option<String>,
    /// None until the receipt is known.
    pub status: Option<i64>,
}

/// One decoded ERC20 Transfer log, unique per (chain, tx, log index).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub chain_id: String,
    pub tx_hash: String,
    pub log_index: i64,
    pub token_address: String,
    pub from_addr: String,
    pub to_addr: String,
    /// Raw token units as a hex string, straight from the log data.
    pub value: String,
    pub block_number: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolanaSlotRecord {
    pub chain_id: String,
    pub slot: i64,
    pub block_time: Option<i64>,
    pub blockhash: Option<String>,
    pub parent_blockhash: Option<String>,
    pub tx_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolanaTxRecord {
    pub chain_id: String,
    pub signature: String,
    pub slot: i64,
    pub fee: Option<i64>,
    pub status: Option<i64>,
}
