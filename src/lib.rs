pub mod api;
pub mod blockchain;
pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use api::error::ApiError;
pub use api::route::create_router;
pub use blockchain::client::{RpcClient, RpcError};
pub use blockchain::poller::{compute_range, ChainPoller};
pub use cache::AppCache;
pub use config::Config;
pub use state::AppState;
