pub mod block;
pub mod chain;
pub mod connection;
pub mod cursor;
pub mod slot;
pub mod transfer;

pub const INIT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS chains (
    id TEXT PRIMARY KEY,
    family TEXT NOT NULL,
    name TEXT NOT NULL,
    rpc_url TEXT NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);

CREATE TABLE IF NOT EXISTS evm_blocks (
    chain_id TEXT NOT NULL,
    number INTEGER NOT NULL,
    hash TEXT NOT NULL,
    parent_hash TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    miner TEXT NOT NULL,
    gas_used INTEGER NOT NULL,
    gas_limit INTEGER NOT NULL,
    tx_count INTEGER NOT NULL,
    PRIMARY KEY (chain_id, number)
);

CREATE TABLE IF NOT EXISTS evm_txs (
    chain_id TEXT NOT NULL,
    hash TEXT NOT NULL,
    block_number INTEGER NOT NULL,
    from_addr TEXT NOT NULL,
    to_addr TEXT,
    value_wei TEXT NOT NULL,
    gas_price TEXT NOT NULL,
    gas_used TEXT,
    status INTEGER,
    created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
    PRIMARY KEY (chain_id, hash)
);

CREATE TABLE IF NOT EXISTS erc20_transfers (
    chain_id TEXT NOT NULL,
    tx_hash TEXT NOT NULL,
    log_index INTEGER NOT NULL,
    token_address TEXT NOT NULL,
    from_addr TEXT NOT NULL,
    to_addr TEXT NOT NULL,
    value TEXT NOT NULL,
    block_number INTEGER NOT NULL,
    PRIMARY KEY (chain_id, tx_hash, log_index)
);

CREATE TABLE IF NOT EXISTS solana_slots (
    chain_id TEXT NOT NULL,
    slot INTEGER NOT NULL,
    block_time INTEGER,
    blockhash TEXT,
    parent_blockhash TEXT,
    tx_count INTEGER NOT NULL,
    PRIMARY KEY (chain_id, slot)
);

CREATE TABLE IF NOT EXISTS solana_txs (
    chain_id TEXT NOT NULL,
    signature TEXT NOT NULL,
    slot INTEGER NOT NULL,
    fee INTEGER,
    status INTEGER,
    created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
    PRIMARY KEY (chain_id, signature)
);

CREATE TABLE IF NOT EXISTS cursors (
    chain_id TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_evm_blocks_chain_number
    ON evm_blocks(chain_id, number DESC);
CREATE INDEX IF NOT EXISTS idx_evm_txs_chain_block
    ON evm_txs(chain_id, block_number DESC);
CREATE INDEX IF NOT EXISTS idx_evm_txs_from_addr
    ON evm_txs(chain_id, from_addr);
CREATE INDEX IF NOT EXISTS idx_evm_txs_to_addr
    ON evm_txs(chain_id, to_addr);
CREATE INDEX IF NOT EXISTS idx_transfers_chain_block
    ON erc20_transfers(chain_id, block_number DESC, log_index DESC);
CREATE INDEX IF NOT EXISTS idx_transfers_from_addr
    ON erc20_transfers(chain_id, from_addr);
CREATE INDEX IF NOT EXISTS idx_transfers_to_addr
    ON erc20_transfers(chain_id, to_addr);
CREATE INDEX IF NOT EXISTS idx_solana_slots_chain_slot
    ON solana_slots(chain_id, slot DESC);
CREATE INDEX IF NOT EXISTS idx_solana_txs_chain_slot
    ON solana_txs(chain_id, slot DESC);
"#;
