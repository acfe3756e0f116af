//! Standalone ERC20 transfer backfill over a block range.
//!
//! Usage: backfill_transfers <chain-id> <start-block> [end-block|latest]

use chain_indexer::blockchain::decoder::decode_transfer;
use chain_indexer::blockchain::models::{parse_hex_i64, EvmBlockRpc, EvmReceiptRpc};
use chain_indexer::blockchain::RpcClient;
use chain_indexer::config::Config;
use chain_indexer::db;
use chain_indexer::models::ChainFamily;
use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("Usage: backfill_transfers <chain-id> <start-block> [end-block|latest]");
        std::process::exit(1);
    }

    let chain_id = &args[0];
    let start_block: i64 = args[1].parse()?;
    let end_arg = args.get(2).map(String::as_str).unwrap_or("latest");

    let config = Config::from_env();
    let chain = config
        .chains
        .iter()
        .find(|c| &c.id == chain_id)
        .ok_or_else(|| format!("chain {} not found in config", chain_id))?;

    if chain.family != ChainFamily::Evm {
        return Err(format!("chain {} is not an EVM chain", chain_id).into());
    }

    let pool = db::connection::establish_connection(&config.database_url).await?;
    let client = RpcClient::new(chain.rpc_url.clone());

    let latest_hex: String = client.call("eth_blockNumber", json!([])).await?;
    let latest = parse_hex_i64(&latest_hex).ok_or("bad block number from RPC")?;

    let end_block = match end_arg {
        "latest" => latest,
        other => other.parse::<i64>()?.min(latest),
    };

    info!(
        "Backfilling transfers for {} from block {} to {} (latest: {})",
        chain_id, start_block, end_block, latest
    );

    let mut processed = 0u64;
    let mut found = 0u64;

    for number in start_block..=end_block {
        let hex = format!("0x{:x}", number);
        let block: EvmBlockRpc = match client.call("eth_getBlockByNumber", json!([hex, true])).await
        {
            Ok(block) => block,
            Err(e) => {
                error!("block {} fetch failed: {}", number, e);
                continue;
            }
        };

        for tx in &block.transactions {
            let receipt: EvmReceiptRpc = match client
                .call("eth_getTransactionReceipt", json!([tx.hash]))
                .await
            {
                Ok(receipt) => receipt,
                Err(e) => {
                    warn!("receipt fetch failed for {}: {}", tx.hash, e);
                    continue;
                }
            };

            for log in &receipt.logs {
                if let Some(event) = decode_transfer(chain_id, &tx.hash, number, log) {
                    db::transfer::upsert_transfer(&pool, &event).await?;
                    found += 1;
                }
            }
        }

        processed += 1;
        if processed % 100 == 0 {
            info!("Processed {} blocks, found {} transfers...", processed, found);
        }
    }

    info!(
        "Backfill complete: {} blocks processed, {} transfers stored",
        processed, found
    );

    Ok(())
}
