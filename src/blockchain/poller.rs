use crate::blockchain::client::{RpcClient, RpcError};
use crate::blockchain::decoder::decode_transfer;
use crate::blockchain::models::{
    empty_solana_slot, normalize_evm_block, normalize_evm_tx, normalize_solana_slot,
    normalize_solana_tx, parse_hex_i64, EvmBlockRpc, EvmReceiptRpc, SolanaBlockRpc,
};
use crate::cache::AppCache;
use crate::config::Config;
use crate::db::{block, cursor, slot, transfer};
use crate::models::{ChainConfig, ChainFamily, TransferRecord};
use futures::stream::{self, StreamExt};
use serde_json::json;
use sqlx::SqlitePool;
use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

// Solana "slot was skipped" / "slot not available" RPC codes. A skipped
// slot is committed as an empty row so the cursor can pass it.
const SLOT_SKIPPED: i64 = -32007;
const SLOT_NOT_AVAILABLE: i64 = -32009;

/// One poller per configured chain, owning its cursor and polling loop.
/// Pollers share nothing mutable; a wedged chain never stalls another.
pub struct ChainPoller {
    chain: ChainConfig,
    client: RpcClient,
    db_pool: SqlitePool,
    cache: AppCache,
    poll_interval: Duration,
    backfill_window: u64,
    backfill_from_genesis: bool,
    receipt_concurrency: usize,
    cursor: Option<i64>,
}

impl ChainPoller {
    pub fn new(chain: ChainConfig, config: &Config, db_pool: SqlitePool, cache: AppCache) -> Self {
        let client = RpcClient::new(chain.rpc_url.clone());
        Self {
            chain,
            client,
            db_pool,
            cache,
            poll_interval: config.poll_interval,
            backfill_window: config.backfill_window,
            backfill_from_genesis: config.backfill_from_genesis,
            receipt_concurrency: config.receipt_concurrency,
            cursor: None,
        }
    }

    /// Main loop: fetch head, compute range, process positions in order,
    /// sleep, repeat. Any tick-level failure is logged and retried on
    /// the next tick; the loop itself only exits on shutdown.
    pub async fn run(mut self, shutdown: CancellationToken) {
        // Durable cursor survives restarts; resume exactly at cursor+1.
        match cursor::get_cursor(&self.db_pool, &self.chain.id).await {
            Ok(position) => self.cursor = position,
            Err(e) => {
                error!("[{}] failed to load cursor: {}", self.chain.id, e);
            }
        }

        info!(
            "[{}] {} poller started (cursor: {:?})",
            self.chain.id,
            self.chain.family.as_str(),
            self.cursor
        );

        let mut ticker = interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.tick(&shutdown).await {
                        error!("[{}] tick failed: {}", self.chain.id, e);
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("[{}] poller shutting down", self.chain.id);
                    break;
                }
            }
        }
    }

    async fn tick(&mut self, shutdown: &CancellationToken) -> Result<(), RpcError> {
        let head = self.fetch_head().await?;

        let Some((start, end)) = compute_range(
            self.cursor,
            head,
            self.backfill_from_genesis,
            self.backfill_window,
        ) else {
            debug!("[{}] head {} already processed", self.chain.id, head);
            return Ok(());
        };

        debug!("[{}] processing range [{}, {}]", self.chain.id, start, end);

        for position in start..=end {
            if shutdown.is_cancelled() {
                break;
            }

            let outcome = match self.chain.family {
                ChainFamily::Evm => self.process_evm_block(position).await,
                ChainFamily::Solana => self.process_solana_slot(position).await,
            };

            match outcome {
                Ok(()) => {
                    // Advance only after the store commit succeeded; a
                    // failed position is re-attempted next tick.
                    self.cursor = Some(position);
                }
                Err(e) => {
                    warn!(
                        "[{}] position {} failed, retrying next tick: {}",
                        self.chain.id, position, e
                    );
                    break;
                }
            }
        }

        Ok(())
    }

    async fn fetch_head(&self) -> Result<i64, RpcError> {
        match self.chain.family {
            ChainFamily::Evm => {
                let hex: String = self.client.call("eth_blockNumber", json!([])).await?;
                parse_hex_i64(&hex).ok_or(RpcError::MissingResult)
            }
            ChainFamily::Solana => {
                let slot: u64 = self.client.call("getSlot", json!([])).await?;
                Ok(slot as i64)
            }
        }
    }

    async fn process_evm_block(&self, number: i64) -> Result<(), PositionError> {
        let hex = format!("0x{:x}", number);
        let raw: EvmBlockRpc = self
            .client
            .call("eth_getBlockByNumber", json!([hex, true]))
            .await?;

        // Receipt fetches within one block are order-independent, so fan
        // them out with bounded concurrency and join before the commit.
        let tx_hashes: Vec<String> = raw.transactions.iter().map(|tx| tx.hash.clone()).collect();
        let receipts: Vec<Option<EvmReceiptRpc>> = stream::iter(tx_hashes)
            .map(|hash| {
                async move {
                    match self
                        .client
                        .call::<EvmReceiptRpc>("eth_getTransactionReceipt", json!([hash]))
                        .await
                    {
                        Ok(receipt) => Some(receipt),
                        Err(e) => {
                            // Degrades the tx to null status/gas fields; the
                            // block still commits with the right tx count.
                            warn!(
                                "[{}] receipt fetch failed for {}: {}",
                                self.chain.id, hash, e
                            );
                            None
                        }
                    }
                }
            })
            .buffered(self.receipt_concurrency.max(1))
            .collect()
            .await;

        let block_record = normalize_evm_block(&self.chain.id, &raw);

        let mut tx_records = Vec::with_capacity(raw.transactions.len());
        let mut transfers: Vec<TransferRecord> = Vec::new();

        for (tx, receipt) in raw.transactions.iter().zip(receipts.iter()) {
            tx_records.push(normalize_evm_tx(
                &self.chain.id,
                block_record.number,
                tx,
                receipt.as_ref(),
            ));

            if let Some(receipt) = receipt {
                for log in &receipt.logs {
                    if let Some(event) =
                        decode_transfer(&self.chain.id, &tx.hash, block_record.number, log)
                    {
                        transfers.push(event);
                    }
                }
            }
        }

        // Transfers land before the block commit: if one fails, the
        // cursor stays put and the whole position replays idempotently.
        for event in &transfers {
            transfer::upsert_transfer(&self.db_pool, event).await?;
        }

        block::upsert_evm_block(&self.db_pool, &block_record, &tx_records).await?;

        // Write-through after the durable commit. Never on the critical
        // path: the store already holds the truth.
        self.cache.put_evm_block(&block_record).await;
        for tx in &tx_records {
            self.cache.put_evm_tx(tx).await;
        }

        debug!(
            "[{}] block {} committed ({} txs, {} transfers)",
            self.chain.id,
            block_record.number,
            tx_records.len(),
            transfers.len()
        );

        Ok(())
    }

    async fn process_solana_slot(&self, position: i64) -> Result<(), PositionError> {
        let params = json!([
            position,
            {
                "transactionDetails": "full",
                "maxSupportedTransactionVersion": 0,
                "rewards": false
            }
        ]);

        let slot_record;
        let mut tx_records = Vec::new();

        match self.client.call::<SolanaBlockRpc>("getBlock", params).await {
            Ok(raw) => {
                slot_record = normalize_solana_slot(&self.chain.id, position, &raw);
                for tx in &raw.transactions {
                    if let Some(record) = normalize_solana_tx(&self.chain.id, position, tx) {
                        tx_records.push(record);
                    }
                }
            }
            Err(RpcError::Rpc { code, .. })
                if code == SLOT_SKIPPED || code == SLOT_NOT_AVAILABLE =>
            {
                debug!("[{}] slot {} was skipped", self.chain.id, position);
                slot_record = empty_solana_slot(&self.chain.id, position);
            }
            Err(e) => return Err(e.into()),
        }

        slot::upsert_solana_slot(&self.db_pool, &slot_record, &tx_records).await?;

        self.cache.put_solana_slot(&slot_record).await;
        for tx in &tx_records {
            self.cache.put_solana_tx(tx).await;
        }

        debug!(
            "[{}] slot {} committed ({} txs)",
            self.chain.id,
            position,
            tx_records.len()
        );

        Ok(())
    }
}

/// Failure while processing one position. Either way the cursor is not
/// advanced and the position is retried on the next tick.
#[derive(Debug, thiserror::Error)]
pub enum PositionError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("store write failed: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// Range-selection policy.
///
/// With a cursor the range is cursor+1..=head. On first run it is either
/// genesis..=head or a trailing window of `backfill_window` positions,
/// clamped to zero. `None` means nothing to do.
pub fn compute_range(
    cursor: Option<i64>,
    head: i64,
    backfill_from_genesis: bool,
    backfill_window: u64,
) -> Option<(i64, i64)> {
    let start = match cursor {
        Some(position) => position + 1,
        None if backfill_from_genesis => 0,
        None => (head - backfill_window as i64 + 1).max(0),
    };

    if start > head {
        None
    } else {
        Some((start, head))
    }
}
