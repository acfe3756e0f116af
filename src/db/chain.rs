use crate::models::ChainConfig;
use sqlx::SqlitePool;

/// Mirror the configured chains into the chains table at startup so
/// queries can join against stable rows.
pub async fn register_chains(pool: &SqlitePool, chains: &[ChainConfig]) -> Result<(), sqlx::Error> {
    let now = chrono::Utc::now().timestamp();

    for chain in chains {
        sqlx::query(
            "INSERT INTO chains (id, family, name, rpc_url, created_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                family = excluded.family,
                name = excluded.name,
                rpc_url = excluded.rpc_url",
        )
        .bind(&chain.id)
        .bind(chain.family.as_str())
        .bind(&chain.name)
        .bind(&chain.rpc_url)
        .bind(now)
        .execute(pool)
        .await?;
    }

    Ok(())
}
