use crate::models::{ChainConfig, ChainFamily};
use dotenv::dotenv;
use std::env;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub poll_interval: Duration,
    pub backfill_window: u64,
    pub backfill_from_genesis: bool,
    pub cache_ttl: Duration,
    pub cache_max_capacity: u64,
    pub recent_limit: usize,
    pub receipt_concurrency: usize,
    pub chains: Vec<ChainConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/indexer.db".to_string());
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "7070".to_string())
            .parse()
            .unwrap_or(7070);
        let poll_interval = env::var("POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(3000));
        let backfill_window = env::var("INITIAL_BACKFILL")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);
        let backfill_from_genesis = env::var("BACKFILL_FROM_GENESIS")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);
        let cache_ttl = env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| "600".to_string())
            .parse()
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(600));
        let cache_max_capacity = env::var("CACHE_MAX_CAPACITY")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .unwrap_or(10_000);
        let recent_limit = env::var("RECENT_LIMIT")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .unwrap_or(300);
        let receipt_concurrency = env::var("RECEIPT_CONCURRENCY")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .unwrap_or(8);

        Self {
            database_url,
            server_host,
            server_port,
            poll_interval,
            backfill_window,
            backfill_from_genesis,
            cache_ttl,
            cache_max_capacity,
            recent_limit,
            receipt_concurrency,
            chains: parse_chains(),
        }
    }
}

/// Chain list comes from INDEXER_CHAINS_JSON; local dev defaults otherwise.
fn parse_chains() -> Vec<ChainConfig> {
    if let Ok(raw) = env::var("INDEXER_CHAINS_JSON") {
        match serde_json::from_str::<Vec<ChainConfig>>(&raw) {
            Ok(parsed) if !parsed.is_empty() => return parsed,
            Ok(_) => warn!("INDEXER_CHAINS_JSON is empty, falling back to defaults"),
            Err(e) => warn!("Failed to parse INDEXER_CHAINS_JSON: {}, falling back to defaults", e),
        }
    }

    vec![
        ChainConfig {
            id: "anvil".to_string(),
            family: ChainFamily::Evm,
            name: "Anvil Local".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
        },
        ChainConfig {
            id: "solana-local".to_string(),
            family: ChainFamily::Solana,
            name: "Solana Local".to_string(),
            rpc_url: "http://localhost:8899".to_string(),
        },
    ]
}
