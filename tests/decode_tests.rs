//! Decoding and rendering tests against the public API

use colorcore::address::{
    render_address, render_asset_address, AddressVersions, INVALID_SCRIPT, UNKNOWN_SCRIPT,
};
use colorcore::error::DecodeError;
use colorcore::marker::{find_marker, parse_marker_at, MarkerOutput};
use colorcore::script::{asset_id_from_script, p2pkh_script};
use colorcore::serialization::{
    calculate_txid, deserialize_transaction, deserialize_transaction_hex, serialize_transaction,
};
use colorcore::*;

fn issuance_tx(quantities: &[u64], metadata: &[u8]) -> Transaction {
    let marker = MarkerOutput {
        asset_quantities: quantities.to_vec(),
        metadata: metadata.to_vec(),
    };
    Transaction {
        version: 1,
        inputs: vec![TransactionInput {
            prevout: OutPoint::new([7; 32], 1),
            script_sig: vec![0x00, 0x14],
            sequence: 0xfffffffe,
        }],
        outputs: vec![
            TransactionOutput { value: 600, script_pubkey: p2pkh_script(&[2; 20]) },
            TransactionOutput { value: 0, script_pubkey: marker.build_script() },
            TransactionOutput { value: 49_000, script_pubkey: p2pkh_script(&[3; 20]) },
        ],
        lock_time: 0,
    }
}

#[test]
fn test_transaction_survives_hex_transport() {
    let tx = issuance_tx(&[1000], b"u=https://cpr.sm/5YgSU1Pg-q");
    let hex = hex::encode(serialize_transaction(&tx));
    let decoded = deserialize_transaction_hex(&hex).unwrap();
    assert_eq!(decoded, tx);
    assert_eq!(calculate_txid(&decoded), calculate_txid(&tx));
}

#[test]
fn test_marker_payload_layout() {
    let tx = issuance_tx(&[100, 300], b"");
    let (index, payload) = find_marker(&tx).unwrap();
    assert_eq!(index, 1);
    // tag, version, count, LEB128 100, LEB128 300, empty metadata
    assert_eq!(payload, &[0x4f, 0x41, 0x01, 0x00, 0x02, 0x64, 0xac, 0x02, 0x00]);
}

#[test]
fn test_marker_with_quantity_past_marker_is_rejected() {
    // outputs 0 and 2 carry quantities but the marker sits at index 1
    let tx = issuance_tx(&[100, 300], b"");
    let (index, payload) = find_marker(&tx).unwrap();
    assert!(parse_marker_at(payload, index).is_err());
}

#[test]
fn test_decoded_issuance_is_colored() {
    let mut provider = MemoryProvider::new();
    let funding_script = p2pkh_script(&[1; 20]);
    let funding = provider.insert(Transaction {
        version: 2,
        inputs: vec![TransactionInput {
            prevout: OutPoint::new([0; 32], COINBASE_INDEX),
            script_sig: vec![0x03, 0x01, 0x02, 0x03],
            sequence: 0xffffffff,
        }],
        outputs: vec![TransactionOutput { value: 50_000, script_pubkey: funding_script.clone() }],
        lock_time: 0,
    });

    let mut tx = issuance_tx(&[250], b"");
    tx.inputs[0].prevout = OutPoint::new(funding, 0);
    let raw = serialize_transaction(&tx);
    let issuance = provider.insert(deserialize_transaction(&raw).unwrap());

    let mut engine = ColoringEngine::new(&provider, OutputCache::new());
    let output = engine.get_output(&issuance, 0).unwrap();
    assert_eq!(output.asset_id, Some(asset_id_from_script(&funding_script)));
    assert_eq!(output.asset_quantity, 250);
    assert_eq!(output.value(), 600);
}

#[test]
fn test_truncated_transaction_is_rejected() {
    let raw = serialize_transaction(&issuance_tx(&[1], b""));
    let result = deserialize_transaction(&raw[..raw.len() - 1]);
    assert!(matches!(result, Err(DecodeError::UnexpectedEnd { .. })));
}

#[test]
fn test_invalid_hex_is_rejected() {
    assert!(matches!(
        deserialize_transaction_hex("01000000zz"),
        Err(DecodeError::InvalidHex(_))
    ));
}

#[test]
fn test_render_p2pkh_on_testnet() {
    let script = hex::decode("76a914cd2b08e4f7a3e4cbde1b3dd6bd0a3b8d4e5ca4e288ac").unwrap();
    let address = render_address(&script, &AddressVersions::TESTNET);
    assert!(address.starts_with('m') || address.starts_with('n'));

    let mainnet = render_address(&script, &AddressVersions::MAINNET);
    assert!(mainnet.starts_with('1'));
    assert_ne!(address, mainnet);
}

#[test]
fn test_render_non_p2pkh_scripts() {
    let versions = AddressVersions::MAINNET;
    let p2sh = hex::decode("a914000102030405060708090a0b0c0d0e0f1011121387").unwrap();
    assert_eq!(render_address(&p2sh, &versions), UNKNOWN_SCRIPT);
    assert_eq!(render_address(&[0x6a, 0x02, 0x4f, 0x41], &versions), UNKNOWN_SCRIPT);
    // push of five bytes with only two present
    assert_eq!(render_address(&[0x05, 0x01, 0x02], &versions), INVALID_SCRIPT);
}

#[test]
fn test_asset_address_uses_p2sh_version() {
    let asset = asset_id_from_script(&p2pkh_script(&[1; 20]));
    assert!(render_asset_address(&asset, &AddressVersions::MAINNET).starts_with('3'));
    assert!(render_asset_address(&asset, &AddressVersions::TESTNET).starts_with('2'));
}
