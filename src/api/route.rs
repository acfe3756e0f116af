use crate::{
    api::{error::ApiError, response::json_list},
    db::{block, slot, transfer},
    models::ChainFamily,
    state::AppState,
    validation::validate_evm_address,
    validation::validate_limit,
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

#[derive(Deserialize)]
pub struct ListQuery {
    limit: Option<String>,
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chains", get(list_chains))
        .route("/chain/{id}/evm/blocks", get(recent_evm_blocks))
        .route("/chain/{id}/evm/txs", get(recent_evm_txs))
        .route("/chain/{id}/evm/address/{address}/txs", get(evm_address_txs))
        .route(
            "/chain/{id}/evm/address/{address}/transfers",
            get(evm_address_transfers),
        )
        .route("/chain/{id}/solana/slots", get(recent_solana_slots))
        .route("/chain/{id}/solana/txs", get(recent_solana_txs))
        .layer(cors)
        .with_state(app_state)
}

async fn list_chains(State(state): State<Arc<AppState>>) -> Json<Vec<crate::models::ChainConfig>> {
    Json(state.config.chains.clone())
}

fn ensure_chain(state: &AppState, id: &str, family: ChainFamily) -> Result<(), ApiError> {
    let known = state
        .config
        .chains
        .iter()
        .any(|c| c.id == id && c.family == family);
    if known {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("unknown chain: {}", id)))
    }
}

/// Recent lists are served from the cache when it has anything, falling
/// back to the store otherwise. A cache miss is never treated as a
/// store miss.
async fn recent_evm_blocks(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<ListQuery>,
) -> Result<Response, ApiError> {
    ensure_chain(&state, &id, ChainFamily::Evm)?;
    let limit = validate_limit(params.limit.as_deref())?;

    let cached = state.cache.get_recent_evm_blocks(&id, limit as usize).await;
    if !cached.is_empty() {
        debug!("served {} recent blocks from cache for {}", cached.len(), id);
        return Ok(json_list(cached));
    }

    let blocks = block::recent_evm_blocks(&state.db_pool, &id, limit).await?;
    Ok(json_list(blocks))
}

async fn recent_evm_txs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<ListQuery>,
) -> Result<Response, ApiError> {
    ensure_chain(&state, &id, ChainFamily::Evm)?;
    let limit = validate_limit(params.limit.as_deref())?;

    let cached = state.cache.get_recent_evm_txs(&id, limit as usize).await;
    if !cached.is_empty() {
        return Ok(json_list(cached));
    }

    let txs = block::recent_evm_txs(&state.db_pool, &id, limit).await?;
    Ok(json_list(txs))
}

async fn evm_address_txs(
    State(state): State<Arc<AppState>>,
    Path((id, address)): Path<(String, String)>,
    Query(params): Query<ListQuery>,
) -> Result<Response, ApiError> {
    ensure_chain(&state, &id, ChainFamily::Evm)?;
    let address = validate_evm_address(&address)?;
    let limit = validate_limit(params.limit.as_deref())?;

    let txs = block::evm_txs_for_address(&state.db_pool, &id, &address, limit).await?;
    Ok(json_list(txs))
}

async fn evm_address_transfers(
    State(state): State<Arc<AppState>>,
    Path((id, address)): Path<(String, String)>,
    Query(params): Query<ListQuery>,
) -> Result<Response, ApiError> {
    ensure_chain(&state, &id, ChainFamily::Evm)?;
    let address = validate_evm_address(&address)?;
    let limit = validate_limit(params.limit.as_deref())?;

    let transfers = transfer::transfers_for_address(&state.db_pool, &id, &address, limit).await?;
    Ok(json_list(transfers))
}

async fn recent_solana_slots(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<ListQuery>,
) -> Result<Response, ApiError> {
    ensure_chain(&state, &id, ChainFamily::Solana)?;
    let limit = validate_limit(params.limit.as_deref())?;

    let cached = state.cache.get_recent_solana_slots(&id, limit as usize).await;
    if !cached.is_empty() {
        return Ok(json_list(cached));
    }

    let slots = slot::recent_solana_slots(&state.db_pool, &id, limit).await?;
    Ok(json_list(slots))
}

async fn recent_solana_txs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<ListQuery>,
) -> Result<Response, ApiError> {
    ensure_chain(&state, &id, ChainFamily::Solana)?;
    let limit = validate_limit(params.limit.as_deref())?;

    let cached = state.cache.get_recent_solana_txs(&id, limit as usize).await;
    if !cached.is_empty() {
        return Ok(json_list(cached));
    }

    let txs = slot::recent_solana_txs(&state.db_pool, &id, limit).await?;
    Ok(json_list(txs))
}
