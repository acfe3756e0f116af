use crate::models::TransferRecord;
use sqlx::{Pool, Row, Sqlite};

pub async fn upsert_transfer(
    pool: &Pool<Sqlite>,
    transfer: &TransferRecord,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO erc20_transfers
            (chain_id, tx_hash, log_index, token_address, from_addr, to_addr, value, block_number)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(chain_id, tx_hash, log_index) DO UPDATE SET
            token_address = excluded.token_address,
            from_addr = excluded.from_addr,
            to_addr = excluded.to_addr,
            value = excluded.value,
            block_number = excluded.block_number",
    )
    .bind(&transfer.chain_id)
    .bind(&transfer.tx_hash)
    .bind(transfer.log_index)
    .bind(&transfer.token_address)
    .bind(&transfer.from_addr)
    .bind(&transfer.to_addr)
    .bind(&transfer.value)
    .bind(transfer.block_number)
    .execute(pool)
    .await?;

    Ok(())
}

/// Newest first by block, ties broken by log index descending.
pub async fn transfers_for_address(
    pool: &Pool<Sqlite>,
    chain_id: &str,
    address: &str,
    limit: i64,
) -> Result<Vec<TransferRecord>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT chain_id, tx_hash, log_index, token_address, from_addr, to_addr, value, block_number
         FROM erc20_transfers
         WHERE chain_id = ? AND (from_addr = ? OR to_addr = ?)
         ORDER BY block_number DESC, log_index DESC
         LIMIT ?",
    )
    .bind(chain_id)
    .bind(address)
    .bind(address)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(transfer_from_row).collect())
}

pub async fn recent_transfers(
    pool: &Pool<Sqlite>,
    chain_id: &str,
    limit: i64,
) -> Result<Vec<TransferRecord>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT chain_id, tx_hash, log_index, token_address, from_addr, to_addr, value, block_number
         FROM erc20_transfers
         WHERE chain_id = ?
         ORDER BY block_number DESC, log_index DESC
         LIMIT ?",
    )
    .bind(chain_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(transfer_from_row).collect())
}

fn transfer_from_row(row: &sqlx::sqlite::SqliteRow) -> TransferRecord {
    TransferRecord {
        chain_id: row.get("chain_id"),
        tx_hash: row.get("tx_hash"),
        log_index: row.get("log_index"),
        token_address: row.get("token_address"),
        from_addr: row.get("from_addr"),
        to_addr: row.get("to_addr"),
        value: row.get("value"),
        block_number: row.get("block_number"),
    }
}
