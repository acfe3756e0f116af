use crate::db::cursor;
use crate::models::{SolanaSlotRecord, SolanaTxRecord};
use sqlx::{Pool, Row, Sqlite};

/// Slot, signatures, and cursor commit as one unit, mirroring the EVM
/// side.
pub async fn upsert_solana_slot(
    pool: &Pool<Sqlite>,
    slot: &SolanaSlotRecord,
    txs: &[SolanaTxRecord],
) -> Result<(), sqlx::Error> {
    let mut db_tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO solana_slots
            (chain_id, slot, block_time, blockhash, parent_blockhash, tx_count)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(chain_id, slot) DO UPDATE SET
            block_time = excluded.block_time,
            blockhash = excluded.blockhash,
            parent_blockhash = excluded.parent_blockhash,
            tx_count = excluded.tx_count",
    )
    .bind(&slot.chain_id)
    .bind(slot.slot)
    .bind(slot.block_time)
    .bind(&slot.blockhash)
    .bind(&slot.parent_blockhash)
    .bind(slot.tx_count)
    .execute(&mut *db_tx)
    .await?;

    for tx in txs {
        sqlx::query(
            "INSERT INTO solana_txs (chain_id, signature, slot, fee, status)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(chain_id, signature) DO UPDATE SET
                slot = excluded.slot,
                fee = excluded.fee,
                status = excluded.status",
        )
        .bind(&tx.chain_id)
        .bind(&tx.signature)
        .bind(tx.slot)
        .bind(tx.fee)
        .bind(tx.status)
        .execute(&mut *db_tx)
        .await?;
    }

    cursor::advance_in_tx(&mut db_tx, &slot.chain_id, slot.slot).await?;

    db_tx.commit().await
}

pub async fn recent_solana_slots(
    pool: &Pool<Sqlite>,
    chain_id: &str,
    limit: i64,
) -> Result<Vec<SolanaSlotRecord>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT chain_id, slot, block_time, blockhash, parent_blockhash, tx_count
         FROM solana_slots WHERE chain_id = ? ORDER BY slot DESC LIMIT ?",
    )
    .bind(chain_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(slot_from_row).collect())
}

pub async fn recent_solana_txs(
    pool: &Pool<Sqlite>,
    chain_id: &str,
    limit: i64,
) -> Result<Vec<SolanaTxRecord>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT chain_id, signature, slot, fee, status
         FROM solana_txs WHERE chain_id = ? ORDER BY slot DESC LIMIT ?",
    )
    .bind(chain_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(tx_from_row).collect())
}

fn slot_from_row(row: &sqlx::sqlite::SqliteRow) -> SolanaSlotRecord {
    SolanaSlotRecord {
        chain_id: row.get("chain_id"),
        slot: row.get("slot"),
        block_time: row.get("block_time"),
        blockhash: row.get("blockhash"),
        parent_blockhash: row.get("parent_blockhash"),
        tx_count: row.get("tx_count"),
    }
}

fn tx_from_row(row: &sqlx::sqlite::SqliteRow) -> SolanaTxRecord {
    SolanaTxRecord {
        chain_id: row.get("chain_id"),
        signature: row.get("signature"),
        slot: row.get("slot"),
        fee: row.get("fee"),
        status: row.get("status"),
    }
}
