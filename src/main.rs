use chain_indexer::blockchain::ChainPoller;
use chain_indexer::cache::AppCache;
use chain_indexer::config::Config;
use chain_indexer::state::AppState;
use chain_indexer::{api, db};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting chain-indexer");

    let config = Config::from_env();
    tracing::info!(
        "Configuration loaded: {} chains, poll interval {:?}",
        config.chains.len(),
        config.poll_interval
    );

    // Startup failures here are fatal: a broken store or chain list
    // means no poller can do useful work.
    let db_pool = db::connection::establish_connection(&config.database_url).await?;
    db::chain::register_chains(&db_pool, &config.chains).await?;

    let cache = AppCache::from_config(&config);
    tracing::info!(
        "Cache initialized (ttl {:?}, recent limit {})",
        config.cache_ttl,
        config.recent_limit
    );

    let app_state = Arc::new(AppState {
        config: config.clone(),
        db_pool: db_pool.clone(),
        cache: cache.clone(),
    });

    let shutdown = CancellationToken::new();
    let mut poller_handles = Vec::new();

    for chain in &config.chains {
        let poller = ChainPoller::new(chain.clone(), &config, db_pool.clone(), cache.clone());
        let token = shutdown.clone();
        poller_handles.push(tokio::spawn(async move {
            poller.run(token).await;
        }));
    }
    tracing::info!("Started {} chain pollers", poller_handles.len());

    let app = api::create_router(app_state);
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Indexer API listening on {}", addr);

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received ctrl-c, shutting down");
                }
                _ = server_shutdown.cancelled() => {}
            }
        })
        .await?;

    // Let in-flight poller work finish before the process exits.
    shutdown.cancel();
    for handle in poller_handles {
        let _ = handle.await;
    }

    Ok(())
}
