use crate::db::{self, block, cursor, slot, transfer};
use crate::models::{
    EvmBlockRecord, EvmTxRecord, SolanaSlotRecord, SolanaTxRecord, TransferRecord,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// In-memory pool pinned to one connection so every query sees the same
/// database.
async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    db::connection::init_schema(&pool).await.expect("schema");
    pool
}

fn make_block(chain_id: &str, number: i64, tx_count: i64) -> EvmBlockRecord {
    EvmBlockRecord {
        chain_id: chain_id.to_string(),
        number,
        hash: format!("0xhash{}", number),
        parent_hash: format!("0xhash{}", number - 1),
        timestamp: 1_700_000_000 + number,
        miner: "0xminer".to_string(),
        gas_used: 21000,
        gas_limit: 30_000_000,
        tx_count,
    }
}

fn make_tx(chain_id: &str, hash: &str, block_number: i64) -> EvmTxRecord {
    EvmTxRecord {
        chain_id: chain_id.to_string(),
        hash: hash.to_string(),
        block_number,
        from_addr: "0xaaaa000000000000000000000000000000000001".to_string(),
        to_addr: Some("0xbbbb000000000000000000000000000000000002".to_string()),
        value_wei: "0xde0b6b3a7640000".to_string(),
        gas_price: "0x3b9aca00".to_string(),
        gas_used: Some("0x5208".to_string()),
        status: Some(1),
    }
}

#[tokio::test]
async fn upsert_block_is_idempotent() {
    let pool = test_pool().await;
    let block_record = make_block("anvil", 5, 1);
    let txs = vec![make_tx("anvil", "0xt1", 5)];

    block::upsert_evm_block(&pool, &block_record, &txs).await.unwrap();
    block::upsert_evm_block(&pool, &block_record, &txs).await.unwrap();

    let blocks = block::recent_evm_blocks(&pool, "anvil", 10).await.unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0], block_record);

    let stored_txs = block::recent_evm_txs(&pool, "anvil", 10).await.unwrap();
    assert_eq!(stored_txs.len(), 1);
    assert_eq!(stored_txs[0], txs[0]);
}

#[tokio::test]
async fn reprocessing_overwrites_mutable_fields_in_place() {
    let pool = test_pool().await;
    let mut block_record = make_block("anvil", 5, 0);
    block::upsert_evm_block(&pool, &block_record, &[]).await.unwrap();

    block_record.hash = "0xreplaced".to_string();
    block_record.tx_count = 3;
    block::upsert_evm_block(&pool, &block_record, &[]).await.unwrap();

    let blocks = block::recent_evm_blocks(&pool, "anvil", 10).await.unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].hash, "0xreplaced");
    assert_eq!(blocks[0].tx_count, 3);
}

#[tokio::test]
async fn tx_renumbering_moves_it_to_the_new_block() {
    let pool = test_pool().await;
    block::upsert_evm_block(&pool, &make_block("anvil", 5, 1), &[make_tx("anvil", "0xt1", 5)])
        .await
        .unwrap();
    block::upsert_evm_block(&pool, &make_block("anvil", 6, 1), &[make_tx("anvil", "0xt1", 6)])
        .await
        .unwrap();

    let txs = block::recent_evm_txs(&pool, "anvil", 10).await.unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].block_number, 6);
}

#[tokio::test]
async fn cursor_advances_with_the_block_commit() {
    let pool = test_pool().await;
    assert_eq!(cursor::get_cursor(&pool, "anvil").await.unwrap(), None);

    block::upsert_evm_block(&pool, &make_block("anvil", 5, 0), &[]).await.unwrap();
    assert_eq!(cursor::get_cursor(&pool, "anvil").await.unwrap(), Some(5));

    block::upsert_evm_block(&pool, &make_block("anvil", 6, 0), &[]).await.unwrap();
    assert_eq!(cursor::get_cursor(&pool, "anvil").await.unwrap(), Some(6));
}

#[tokio::test]
async fn cursor_never_moves_backwards() {
    let pool = test_pool().await;
    block::upsert_evm_block(&pool, &make_block("anvil", 9, 0), &[]).await.unwrap();
    // Re-running an earlier position must not regress the cursor.
    block::upsert_evm_block(&pool, &make_block("anvil", 4, 0), &[]).await.unwrap();

    assert_eq!(cursor::get_cursor(&pool, "anvil").await.unwrap(), Some(9));
}

#[tokio::test]
async fn cursors_are_chain_scoped() {
    let pool = test_pool().await;
    block::upsert_evm_block(&pool, &make_block("anvil", 5, 0), &[]).await.unwrap();

    assert_eq!(cursor::get_cursor(&pool, "anvil").await.unwrap(), Some(5));
    assert_eq!(cursor::get_cursor(&pool, "other").await.unwrap(), None);
}

#[tokio::test]
async fn receiptless_tx_row_keeps_core_fields() {
    let pool = test_pool().await;
    let mut tx = make_tx("anvil", "0xt1", 5);
    tx.gas_used = None;
    tx.status = None;

    block::upsert_evm_block(&pool, &make_block("anvil", 5, 1), &[tx]).await.unwrap();

    let stored = block::recent_evm_txs(&pool, "anvil", 10).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].gas_used.is_none());
    assert!(stored[0].status.is_none());
    assert!(!stored[0].from_addr.is_empty());
    assert!(!stored[0].value_wei.is_empty());

    let blocks = block::recent_evm_blocks(&pool, "anvil", 10).await.unwrap();
    assert_eq!(blocks[0].tx_count, 1);
}

#[tokio::test]
async fn recent_blocks_come_back_newest_first_and_bounded() {
    let pool = test_pool().await;
    for number in 0..5 {
        block::upsert_evm_block(&pool, &make_block("anvil", number, 0), &[])
            .await
            .unwrap();
    }

    let blocks = block::recent_evm_blocks(&pool, "anvil", 3).await.unwrap();
    let numbers: Vec<i64> = blocks.iter().map(|b| b.number).collect();
    assert_eq!(numbers, vec![4, 3, 2]);
}

#[tokio::test]
async fn address_query_matches_either_side() {
    let pool = test_pool().await;
    let mut outgoing = make_tx("anvil", "0xout", 5);
    outgoing.from_addr = "0x1111111111111111111111111111111111111111".to_string();
    let mut incoming = make_tx("anvil", "0xin", 6);
    incoming.to_addr = Some("0x1111111111111111111111111111111111111111".to_string());
    let unrelated = make_tx("anvil", "0xother", 7);

    block::upsert_evm_block(&pool, &make_block("anvil", 5, 1), &[outgoing]).await.unwrap();
    block::upsert_evm_block(&pool, &make_block("anvil", 6, 1), &[incoming]).await.unwrap();
    block::upsert_evm_block(&pool, &make_block("anvil", 7, 1), &[unrelated]).await.unwrap();

    let txs = block::evm_txs_for_address(
        &pool,
        "anvil",
        "0x1111111111111111111111111111111111111111",
        10,
    )
    .await
    .unwrap();

    let hashes: Vec<&str> = txs.iter().map(|t| t.hash.as_str()).collect();
    assert_eq!(hashes, vec!["0xin", "0xout"]);
}

fn make_transfer(tx_hash: &str, log_index: i64, block_number: i64) -> TransferRecord {
    TransferRecord {
        chain_id: "anvil".to_string(),
        tx_hash: tx_hash.to_string(),
        log_index,
        token_address: "0xtoken".to_string(),
        from_addr: "0xaaaa000000000000000000000000000000000001".to_string(),
        to_addr: "0xbbbb000000000000000000000000000000000002".to_string(),
        value: "0x64".to_string(),
        block_number,
    }
}

#[tokio::test]
async fn transfer_upsert_is_idempotent_per_log() {
    let pool = test_pool().await;
    let event = make_transfer("0xt1", 0, 5);

    transfer::upsert_transfer(&pool, &event).await.unwrap();
    transfer::upsert_transfer(&pool, &event).await.unwrap();
    // Same tx, different log index: a distinct row.
    transfer::upsert_transfer(&pool, &make_transfer("0xt1", 1, 5)).await.unwrap();

    let transfers = transfer::recent_transfers(&pool, "anvil", 10).await.unwrap();
    assert_eq!(transfers.len(), 2);
}

#[tokio::test]
async fn transfers_order_by_block_then_log_index_desc() {
    let pool = test_pool().await;
    transfer::upsert_transfer(&pool, &make_transfer("0xa", 0, 5)).await.unwrap();
    transfer::upsert_transfer(&pool, &make_transfer("0xa", 2, 5)).await.unwrap();
    transfer::upsert_transfer(&pool, &make_transfer("0xb", 1, 6)).await.unwrap();

    let transfers = transfer::transfers_for_address(
        &pool,
        "anvil",
        "0xaaaa000000000000000000000000000000000001",
        10,
    )
    .await
    .unwrap();

    let keys: Vec<(i64, i64)> = transfers.iter().map(|t| (t.block_number, t.log_index)).collect();
    assert_eq!(keys, vec![(6, 1), (5, 2), (5, 0)]);
}

fn make_slot(chain_id: &str, position: i64, tx_count: i64) -> SolanaSlotRecord {
    SolanaSlotRecord {
        chain_id: chain_id.to_string(),
        slot: position,
        block_time: Some(1_700_000_000 + position),
        blockhash: Some(format!("hash{}", position)),
        parent_blockhash: Some(format!("hash{}", position - 1)),
        tx_count,
    }
}

#[tokio::test]
async fn solana_slot_upsert_is_idempotent_and_advances_cursor() {
    let pool = test_pool().await;
    let slot_record = make_slot("solana-local", 100, 1);
    let txs = vec![SolanaTxRecord {
        chain_id: "solana-local".to_string(),
        signature: "sig1".to_string(),
        slot: 100,
        fee: Some(5000),
        status: Some(1),
    }];

    slot::upsert_solana_slot(&pool, &slot_record, &txs).await.unwrap();
    slot::upsert_solana_slot(&pool, &slot_record, &txs).await.unwrap();

    let slots = slot::recent_solana_slots(&pool, "solana-local", 10).await.unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0], slot_record);

    let stored = slot::recent_solana_txs(&pool, "solana-local", 10).await.unwrap();
    assert_eq!(stored.len(), 1);

    assert_eq!(cursor::get_cursor(&pool, "solana-local").await.unwrap(), Some(100));
}

#[tokio::test]
async fn empty_slot_row_still_commits() {
    let pool = test_pool().await;
    let slot_record = SolanaSlotRecord {
        chain_id: "solana-local".to_string(),
        slot: 101,
        block_time: None,
        blockhash: None,
        parent_blockhash: None,
        tx_count: 0,
    };

    slot::upsert_solana_slot(&pool, &slot_record, &[]).await.unwrap();

    let slots = slot::recent_solana_slots(&pool, "solana-local", 10).await.unwrap();
    assert_eq!(slots.len(), 1);
    assert!(slots[0].blockhash.is_none());
    assert_eq!(cursor::get_cursor(&pool, "solana-local").await.unwrap(), Some(101));
}

#[tokio::test]
async fn chains_are_isolated_in_every_table() {
    let pool = test_pool().await;
    block::upsert_evm_block(&pool, &make_block("anvil", 5, 0), &[]).await.unwrap();
    block::upsert_evm_block(&pool, &make_block("anvil-2", 9, 0), &[]).await.unwrap();

    let anvil = block::recent_evm_blocks(&pool, "anvil", 10).await.unwrap();
    let anvil2 = block::recent_evm_blocks(&pool, "anvil-2", 10).await.unwrap();
    assert_eq!(anvil.len(), 1);
    assert_eq!(anvil2.len(), 1);
    assert_eq!(anvil[0].number, 5);
    assert_eq!(anvil2[0].number, 9);
}
