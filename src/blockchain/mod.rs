pub mod client;
pub mod decoder;
pub mod models;
pub mod poller;

// Re-exports for convenience
pub use client::{RpcClient, RpcError};
pub use poller::{compute_range, ChainPoller};
