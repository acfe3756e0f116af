//! Structured cache keys, rendered to strings for the point cache.

use std::fmt;

/// Entity kinds a recent set is kept for, per chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    EvmBlock,
    EvmTx,
    SolanaSlot,
    SolanaTx,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    EvmBlock { chain_id: String, number: i64 },
    EvmTx { chain_id: String, hash: String },
    SolanaSlot { chain_id: String, slot: i64 },
    SolanaTx { chain_id: String, signature: String },
}

impl CacheKey {
    pub fn evm_block(chain_id: &str, number: i64) -> Self {
        Self::EvmBlock {
            chain_id: chain_id.to_string(),
            number,
        }
    }

    pub fn evm_tx(chain_id: &str, hash: &str) -> Self {
        Self::EvmTx {
            chain_id: chain_id.to_string(),
            hash: hash.to_string(),
        }
    }

    pub fn solana_slot(chain_id: &str, slot: i64) -> Self {
        Self::SolanaSlot {
            chain_id: chain_id.to_string(),
            slot,
        }
    }

    pub fn solana_tx(chain_id: &str, signature: &str) -> Self {
        Self::SolanaTx {
            chain_id: chain_id.to_string(),
            signature: signature.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EvmBlock { chain_id, number } => write!(f, "evm:block:{}:{}", chain_id, number),
            Self::EvmTx { chain_id, hash } => write!(f, "evm:tx:{}:{}", chain_id, hash),
            Self::SolanaSlot { chain_id, slot } => write!(f, "solana:slot:{}:{}", chain_id, slot),
            Self::SolanaTx { chain_id, signature } => {
                write!(f, "solana:tx:{}:{}", chain_id, signature)
            }
        }
    }
}
