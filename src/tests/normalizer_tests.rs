use crate::blockchain::models::{
    empty_solana_slot, normalize_evm_block, normalize_evm_tx, normalize_solana_slot,
    normalize_solana_tx, parse_hex_i64, EvmBlockRpc, EvmReceiptRpc, EvmTxRpc, SolanaBlockRpc,
    SolanaTxBody, SolanaTxMeta, SolanaTxRpc,
};
use serde_json::json;

fn raw_tx() -> EvmTxRpc {
    EvmTxRpc {
        hash: "0xdeadbeef".to_string(),
        from: "0xAAAA000000000000000000000000000000000001".to_string(),
        to: Some("0xBBBB000000000000000000000000000000000002".to_string()),
        value: "0xde0b6b3a7640000".to_string(), // 1 ether, > u53
        gas_price: Some("0x3b9aca00".to_string()),
    }
}

fn raw_block() -> EvmBlockRpc {
    EvmBlockRpc {
        number: "0x2a".to_string(),
        hash: "0xblockhash".to_string(),
        parent_hash: "0xparenthash".to_string(),
        timestamp: "0x65f0a1c0".to_string(),
        miner: "0xminer".to_string(),
        gas_used: "0x5208".to_string(),
        gas_limit: "0x1c9c380".to_string(),
        transactions: vec![raw_tx()],
    }
}

#[test]
fn hex_parsing_handles_prefix_and_empty() {
    assert_eq!(parse_hex_i64("0x2a"), Some(42));
    assert_eq!(parse_hex_i64("2a"), Some(42));
    assert_eq!(parse_hex_i64("0x"), Some(0));
    assert_eq!(parse_hex_i64("0xzz"), None);
}

#[test]
fn evm_block_integers_parse_but_counts_stay() {
    let record = normalize_evm_block("anvil", &raw_block());

    assert_eq!(record.number, 42);
    assert_eq!(record.timestamp, 0x65f0a1c0);
    assert_eq!(record.gas_used, 21000);
    assert_eq!(record.tx_count, 1);
    assert_eq!(record.chain_id, "anvil");
}

#[test]
fn evm_tx_keeps_wei_amounts_as_strings() {
    let receipt = EvmReceiptRpc {
        status: Some("0x1".to_string()),
        gas_used: Some("0x5208".to_string()),
        logs: vec![],
    };
    let record = normalize_evm_tx("anvil", 42, &raw_tx(), Some(&receipt));

    // Values past 53-bit range never go through an integer.
    assert_eq!(record.value_wei, "0xde0b6b3a7640000");
    assert_eq!(record.gas_price, "0x3b9aca00");
    assert_eq!(record.status, Some(1));
    assert_eq!(record.gas_used.as_deref(), Some("0x5208"));
    assert_eq!(record.from_addr, "0xaaaa000000000000000000000000000000000001");
}

#[test]
fn missing_receipt_degrades_to_null_fields() {
    let record = normalize_evm_tx("anvil", 42, &raw_tx(), None);

    assert_eq!(record.hash, "0xdeadbeef");
    assert!(record.gas_used.is_none());
    assert!(record.status.is_none());
    // The rest of the record survives intact.
    assert_eq!(record.block_number, 42);
    assert!(!record.value_wei.is_empty());
}

#[test]
fn solana_slot_allows_null_block_time() {
    let block = SolanaBlockRpc {
        block_time: None,
        blockhash: Some("hash1".to_string()),
        previous_blockhash: Some("hash0".to_string()),
        transactions: vec![],
    };
    let record = normalize_solana_slot("solana-local", 99, &block);

    assert_eq!(record.slot, 99);
    assert!(record.block_time.is_none());
    assert_eq!(record.tx_count, 0);
}

#[test]
fn solana_tx_status_follows_meta_err() {
    let ok_tx = SolanaTxRpc {
        transaction: SolanaTxBody {
            signatures: vec!["sig1".to_string()],
        },
        meta: Some(SolanaTxMeta {
            fee: Some(5000),
            err: None,
        }),
    };
    let failed_tx = SolanaTxRpc {
        transaction: SolanaTxBody {
            signatures: vec!["sig2".to_string()],
        },
        meta: Some(SolanaTxMeta {
            fee: Some(5000),
            err: Some(json!({"InstructionError": [0, "Custom"]})),
        }),
    };
    let no_meta_tx = SolanaTxRpc {
        transaction: SolanaTxBody {
            signatures: vec!["sig3".to_string()],
        },
        meta: None,
    };

    assert_eq!(normalize_solana_tx("s", 1, &ok_tx).unwrap().status, Some(1));
    assert_eq!(normalize_solana_tx("s", 1, &failed_tx).unwrap().status, Some(0));
    assert_eq!(normalize_solana_tx("s", 1, &no_meta_tx).unwrap().status, None);
}

#[test]
fn solana_tx_without_signature_is_dropped() {
    let tx = SolanaTxRpc {
        transaction: SolanaTxBody { signatures: vec![] },
        meta: None,
    };
    assert!(normalize_solana_tx("s", 1, &tx).is_none());
}

#[test]
fn skipped_slot_normalizes_to_empty_row() {
    let record = empty_solana_slot("solana-local", 77);
    assert_eq!(record.slot, 77);
    assert_eq!(record.tx_count, 0);
    assert!(record.blockhash.is_none());
}

#[test]
fn raw_block_deserializes_from_rpc_shape() {
    let payload = json!({
        "number": "0x10",
        "hash": "0xh",
        "parentHash": "0xp",
        "timestamp": "0x100",
        "miner": "0xm",
        "gasUsed": "0x0",
        "gasLimit": "0x0",
        "transactions": [{
            "hash": "0xt",
            "from": "0xf",
            "to": null,
            "value": "0x0",
            "gasPrice": "0x1"
        }]
    });

    let block: EvmBlockRpc = serde_json::from_value(payload).unwrap();
    assert_eq!(block.transactions.len(), 1);
    assert!(block.transactions[0].to.is_none());
}
