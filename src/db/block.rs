use crate::db::cursor;
use crate::models::{EvmBlockRecord, EvmTxRecord};
use sqlx::{Pool, Row, Sqlite};

/// Commit one block, all of its transactions, and the chain cursor as a
/// single unit. Either everything lands or nothing does, so a block row
/// can never exist with a wrong tx_count or a cursor past an uncommitted
/// position.
pub async fn upsert_evm_block(
    pool: &Pool<Sqlite>,
    block: &EvmBlockRecord,
    txs: &[EvmTxRecord],
) -> Result<(), sqlx::Error> {
    let mut db_tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO evm_blocks
            (chain_id, number, hash, parent_hash, timestamp, miner, gas_used, gas_limit, tx_count)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(chain_id, number) DO UPDATE SET
            hash = excluded.hash,
            parent_hash = excluded.parent_hash,
            timestamp = excluded.timestamp,
            miner = excluded.miner,
            gas_used = excluded.gas_used,
            gas_limit = excluded.gas_limit,
            tx_count = excluded.tx_count",
    )
    .bind(&block.chain_id)
    .bind(block.number)
    .bind(&block.hash)
    .bind(&block.parent_hash)
    .bind(block.timestamp)
    .bind(&block.miner)
    .bind(block.gas_used)
    .bind(block.gas_limit)
    .bind(block.tx_count)
    .execute(&mut *db_tx)
    .await?;

    for tx in txs {
        sqlx::query(
            "INSERT INTO evm_txs
                (chain_id, hash, block_number, from_addr, to_addr, value_wei, gas_price, gas_used, status)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(chain_id, hash) DO UPDATE SET
                block_number = excluded.block_number,
                from_addr = excluded.from_addr,
                to_addr = excluded.to_addr,
                value_wei = excluded.value_wei,
                gas_price = excluded.gas_price,
                gas_used = excluded.gas_used,
                status = excluded.status",
        )
        .bind(&tx.chain_id)
        .bind(&tx.hash)
        .bind(tx.block_number)
        .bind(&tx.from_addr)
        .bind(&tx.to_addr)
        .bind(&tx.value_wei)
        .bind(&tx.gas_price)
        .bind(&tx.gas_used)
        .bind(tx.status)
        .execute(&mut *db_tx)
        .await?;
    }

    cursor::advance_in_tx(&mut db_tx, &block.chain_id, block.number).await?;

    db_tx.commit().await
}

pub async fn recent_evm_blocks(
    pool: &Pool<Sqlite>,
    chain_id: &str,
    limit: i64,
) -> Result<Vec<EvmBlockRecord>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT chain_id, number, hash, parent_hash, timestamp, miner, gas_used, gas_limit, tx_count
         FROM evm_blocks WHERE chain_id = ? ORDER BY number DESC LIMIT ?",
    )
    .bind(chain_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(block_from_row).collect())
}

pub async fn recent_evm_txs(
    pool: &Pool<Sqlite>,
    chain_id: &str,
    limit: i64,
) -> Result<Vec<EvmTxRecord>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT chain_id, hash, block_number, from_addr, to_addr, value_wei, gas_price, gas_used, status
         FROM evm_txs WHERE chain_id = ? ORDER BY block_number DESC LIMIT ?",
    )
    .bind(chain_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(tx_from_row).collect())
}

pub async fn evm_txs_for_address(
    pool: &Pool<Sqlite>,
    chain_id: &str,
    address: &str,
    limit: i64,
) -> Result<Vec<EvmTxRecord>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT chain_id, hash, block_number, from_addr, to_addr, value_wei, gas_price, gas_used, status
         FROM evm_txs
         WHERE chain_id = ? AND (from_addr = ? OR to_addr = ?)
         ORDER BY block_number DESC
         LIMIT ?",
    )
    .bind(chain_id)
    .bind(address)
    .bind(address)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(tx_from_row).collect())
}

fn block_from_row(row: &sqlx::sqlite::SqliteRow) -> EvmBlockRecord {
    EvmBlockRecord {
        chain_id: row.get("chain_id"),
        number: row.get("number"),
        hash: row.get("hash"),
        parent_hash: row.get("parent_hash"),
        timestamp: row.get("timestamp"),
        miner: row.get("miner"),
        gas_used: row.get("gas_used"),
        gas_limit: row.get("gas_limit"),
        tx_count: row.get("tx_count"),
    }
}

fn tx_from_row(row: &sqlx::sqlite::SqliteRow) -> EvmTxRecord {
    EvmTxRecord {
        chain_id: row.get("chain_id"),
        hash: row.get("hash"),
        block_number: row.get("block_number"),
        from_addr: row.get("from_addr"),
        to_addr: row.get("to_addr"),
        value_wei: row.get("value_wei"),
        gas_price: row.get("gas_price"),
        gas_used: row.get("gas_used"),
        status: row.get("status"),
    }
}
