pub mod keys;
pub mod recent;

pub use keys::{CacheKey, EntityKind};
pub use recent::RecentSet;

use crate::config::Config;
use crate::models::{EvmBlockRecord, EvmTxRecord, SolanaSlotRecord, SolanaTxRecord};
use moka::future::Cache;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// One cached record. Point entries expire on the hot TTL independently
/// of recent-set membership.
#[derive(Debug, Clone)]
pub enum CachedEntity {
    EvmBlock(EvmBlockRecord),
    EvmTx(EvmTxRecord),
    SolanaSlot(SolanaSlotRecord),
    SolanaTx(SolanaTxRecord),
}

/// Hot-path cache in front of the store. Never authoritative: every
/// entry is reconstructible from the database, and losing the whole
/// thing costs latency, not correctness.
#[derive(Clone)]
pub struct AppCache {
    points: Cache<String, CachedEntity>,
    recent: Arc<Mutex<HashMap<(String, EntityKind), RecentSet>>>,
    recent_limit: usize,
}

impl AppCache {
    pub fn new(ttl: std::time::Duration, max_capacity: u64, recent_limit: usize) -> Self {
        let points = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build();

        Self {
            points,
            recent: Arc::new(Mutex::new(HashMap::new())),
            recent_limit,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.cache_ttl,
            config.cache_max_capacity,
            config.recent_limit,
        )
    }

    async fn add_recent(&self, chain_id: &str, kind: EntityKind, position: i64, id: String) {
        let mut recent = self.recent.lock().await;
        recent
            .entry((chain_id.to_string(), kind))
            .or_default()
            .insert(position, id, self.recent_limit);
    }

    async fn recent_ids(&self, chain_id: &str, kind: EntityKind, limit: usize) -> Vec<String> {
        let recent = self.recent.lock().await;
        recent
            .get(&(chain_id.to_string(), kind))
            .map(|set| set.newest(limit))
            .unwrap_or_default()
    }

    pub async fn put_evm_block(&self, block: &EvmBlockRecord) {
        let key = CacheKey::evm_block(&block.chain_id, block.number).to_string();
        self.points
            .insert(key, CachedEntity::EvmBlock(block.clone()))
            .await;
        self.add_recent(
            &block.chain_id,
            EntityKind::EvmBlock,
            block.number,
            block.number.to_string(),
        )
        .await;
    }

    /// Transactions rank by their owning block so the recent list stays
    /// chain-ordered even though the tx key is a hash.
    pub async fn put_evm_tx(&self, tx: &EvmTxRecord) {
        let key = CacheKey::evm_tx(&tx.chain_id, &tx.hash).to_string();
        self.points.insert(key, CachedEntity::EvmTx(tx.clone())).await;
        self.add_recent(
            &tx.chain_id,
            EntityKind::EvmTx,
            tx.block_number,
            tx.hash.clone(),
        )
        .await;
    }

    pub async fn put_solana_slot(&self, slot: &SolanaSlotRecord) {
        let key = CacheKey::solana_slot(&slot.chain_id, slot.slot).to_string();
        self.points
            .insert(key, CachedEntity::SolanaSlot(slot.clone()))
            .await;
        self.add_recent(
            &slot.chain_id,
            EntityKind::SolanaSlot,
            slot.slot,
            slot.slot.to_string(),
        )
        .await;
    }

    pub async fn put_solana_tx(&self, tx: &SolanaTxRecord) {
        let key = CacheKey::solana_tx(&tx.chain_id, &tx.signature).to_string();
        self.points
            .insert(key, CachedEntity::SolanaTx(tx.clone()))
            .await;
        self.add_recent(
            &tx.chain_id,
            EntityKind::SolanaTx,
            tx.slot,
            tx.signature.clone(),
        )
        .await;
    }

    pub async fn get_evm_block(&self, chain_id: &str, number: i64) -> Option<EvmBlockRecord> {
        let key = CacheKey::evm_block(chain_id, number).to_string();
        match self.points.get(&key).await {
            Some(CachedEntity::EvmBlock(block)) => Some(block),
            _ => None,
        }
    }

    pub async fn get_evm_tx(&self, chain_id: &str, hash: &str) -> Option<EvmTxRecord> {
        let key = CacheKey::evm_tx(chain_id, hash).to_string();
        match self.points.get(&key).await {
            Some(CachedEntity::EvmTx(tx)) => Some(tx),
            _ => None,
        }
    }

    pub async fn get_solana_slot(&self, chain_id: &str, slot: i64) -> Option<SolanaSlotRecord> {
        let key = CacheKey::solana_slot(chain_id, slot).to_string();
        match self.points.get(&key).await {
            Some(CachedEntity::SolanaSlot(record)) => Some(record),
            _ => None,
        }
    }

    pub async fn get_solana_tx(&self, chain_id: &str, signature: &str) -> Option<SolanaTxRecord> {
        let key = CacheKey::solana_tx(chain_id, signature).to_string();
        match self.points.get(&key).await {
            Some(CachedEntity::SolanaTx(tx)) => Some(tx),
            _ => None,
        }
    }

    /// Point entries may have expired out from under the recent set;
    /// those ids are skipped and the caller falls back to the store if
    /// nothing is left.
    pub async fn get_recent_evm_blocks(&self, chain_id: &str, limit: usize) -> Vec<EvmBlockRecord> {
        let ids = self
            .recent_ids(chain_id, EntityKind::EvmBlock, limit)
            .await;
        let mut blocks = Vec::with_capacity(ids.len());
        for id in ids {
            if let Ok(number) = id.parse::<i64>() {
                if let Some(block) = self.get_evm_block(chain_id, number).await {
                    blocks.push(block);
                }
            }
        }
        debug!("recent evm blocks cache served {} of {}", blocks.len(), limit);
        blocks
    }

    pub async fn get_recent_evm_txs(&self, chain_id: &str, limit: usize) -> Vec<EvmTxRecord> {
        let ids = self.recent_ids(chain_id, EntityKind::EvmTx, limit).await;
        let mut txs = Vec::with_capacity(ids.len());
        for hash in ids {
            if let Some(tx) = self.get_evm_tx(chain_id, &hash).await {
                txs.push(tx);
            }
        }
        txs
    }

    pub async fn get_recent_solana_slots(
        &self,
        chain_id: &str,
        limit: usize,
    ) -> Vec<SolanaSlotRecord> {
        let ids = self
            .recent_ids(chain_id, EntityKind::SolanaSlot, limit)
            .await;
        let mut slots = Vec::with_capacity(ids.len());
        for id in ids {
            if let Ok(slot) = id.parse::<i64>() {
                if let Some(record) = self.get_solana_slot(chain_id, slot).await {
                    slots.push(record);
                }
            }
        }
        slots
    }

    pub async fn get_recent_solana_txs(&self, chain_id: &str, limit: usize) -> Vec<SolanaTxRecord> {
        let ids = self.recent_ids(chain_id, EntityKind::SolanaTx, limit).await;
        let mut txs = Vec::with_capacity(ids.len());
        for signature in ids {
            if let Some(tx) = self.get_solana_tx(chain_id, &signature).await {
                txs.push(tx);
            }
        }
        txs
    }

    /// Size of one recent set, for tests and introspection.
    pub async fn recent_len(&self, chain_id: &str, kind: EntityKind) -> usize {
        let recent = self.recent.lock().await;
        recent
            .get(&(chain_id.to_string(), kind))
            .map(|set| set.len())
            .unwrap_or(0)
    }
}
