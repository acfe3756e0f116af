use sqlx::{Pool, Row, Sqlite, Transaction};

/// Advance the chain cursor inside an already-open write transaction.
/// max() keeps the cursor monotonic even if an older position is ever
/// re-processed.
pub async fn advance_in_tx(
    db_tx: &mut Transaction<'_, Sqlite>,
    chain_id: &str,
    position: i64,
) -> Result<(), sqlx::Error> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO cursors (chain_id, position, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(chain_id) DO UPDATE SET
            position = max(excluded.position, cursors.position),
            updated_at = excluded.updated_at",
    )
    .bind(chain_id)
    .bind(position)
    .bind(now)
    .execute(&mut **db_tx)
    .await?;

    Ok(())
}

/// Last fully processed position for a chain, or None on first run.
pub async fn get_cursor(pool: &Pool<Sqlite>, chain_id: &str) -> Result<Option<i64>, sqlx::Error> {
    let row = sqlx::query("SELECT position FROM cursors WHERE chain_id = ?")
        .bind(chain_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get("position")))
}
