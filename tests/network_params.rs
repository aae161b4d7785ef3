use std::collections::HashMap;
use std::sync::Arc;

use zija_node_rust::blockchain::block_index::BlockIndex;
use zija_node_rust::config::NodeConfig;
use zija_node_rust::p2p::messages::{command, BlockHeaderData, MessageHeader};
use zija_node_rust::util::{uint256_from_hex, Hash256};
use zija_node_rust::{
    network_selector, ChainPositionSample, Checkpoints, ConfigError, Network, NetworkSelector, ParamsError,
};

fn fresh() -> (Arc<NetworkSelector>, Checkpoints) {
    let selector = Arc::new(NetworkSelector::new().unwrap());
    let checkpoints = Checkpoints::new(Arc::clone(&selector)).unwrap();
    (selector, checkpoints)
}

fn index_entry(hash: Hash256, height: i32, chain_tx: u64) -> BlockIndex {
    let header = BlockHeaderData {
        version: 1,
        prev_block_hash: [0u8; 32],
        merkle_root: [0u8; 32],
        timestamp: 1_537_000_000,
        bits: 0x1e0ffff0,
        nonce: height as u32,
    };
    let mut entry = BlockIndex::new(header, height, None, chain_tx);
    // Stand-in for a block whose real header hashes to the checkpoint.
    entry.hash = hash;
    entry
}

#[test]
fn startup_on_testnet_gates_against_testnet_table() {
    let (selector, checkpoints) = fresh();
    let cfg = NodeConfig::from_toml_str("testnet = true").unwrap();
    assert_eq!(cfg.apply(&selector, &checkpoints).unwrap(), Network::Testnet);

    let genesis = selector.params().hash_genesis_block;
    assert!(checkpoints.check_block(0, &genesis));
    assert!(!checkpoints.check_block(0, &[0xab; 32]));
    // Main checkpoints do not apply on testnet.
    let h50 = uint256_from_hex("0x104ce025b4bab89d852190b2cb45dcb751587519ce63e1e3e9d5d9f42d873cf6").unwrap();
    assert!(checkpoints.check_block(50, &[0xab; 32]));
    assert!(checkpoints.check_block(50, &h50));
    assert_eq!(checkpoints.total_blocks_estimate(), 0);
}

#[test]
fn conflicting_flags_keep_previous_network() {
    let (selector, checkpoints) = fresh();
    selector.select(Network::Regtest).unwrap();
    let cfg = NodeConfig::from_toml_str("testnet = true\nregtest = true").unwrap();
    let err = cfg.apply(&selector, &checkpoints).unwrap_err();
    assert!(matches!(err, ConfigError::ConflictingNetworks));
    assert_eq!(err.to_string(), "invalid combination of -regtest and -testnet");
    assert_eq!(selector.network(), Network::Regtest);
}

#[test]
fn last_checkpoint_anchors_on_most_recent_known_block() {
    let (_selector, checkpoints) = fresh();
    let data = checkpoints.active_data().clone();
    let mut index: HashMap<Hash256, BlockIndex> = HashMap::new();
    for height in [50, 250, 3333] {
        let hash = data.checkpoints[&height];
        index.insert(hash, index_entry(hash, height, height as u64));
    }
    let anchor = checkpoints.last_checkpoint(&index).unwrap();
    assert_eq!(anchor.height, 3333);

    checkpoints.set_enabled(false);
    assert!(checkpoints.last_checkpoint(&index).is_none());
}

#[test]
fn progress_from_block_index_sample() {
    let (_selector, checkpoints) = fresh();
    let data = checkpoints.active_data().clone();
    assert_eq!(checkpoints.guess_verification_progress(None, true), 0.0);

    let early = ChainPositionSample { chain_tx: 1_000, time: data.time_last_checkpoint - 86_400 };
    let at = ChainPositionSample {
        chain_tx: data.transactions_last_checkpoint as u64,
        time: data.time_last_checkpoint,
    };
    let now = data.time_last_checkpoint + 30 * 86_400;
    let p_early = zija_node_rust::guess_verification_progress(&data, Some(&early), true, now);
    let p_at = zija_node_rust::guess_verification_progress(&data, Some(&at), true, now);
    assert!(0.0 < p_early && p_early < p_at && p_at < 1.0);

    let entry = index_entry([0x01; 32], 23392, data.transactions_last_checkpoint as u64);
    let live = checkpoints.guess_verification_progress(Some(&entry.position_sample()), false);
    assert!(live > 0.0 && live < 1.0);
}

#[test]
fn frames_carry_active_magic() {
    let (selector, _checkpoints) = fresh();
    for network in Network::ALL {
        selector.select(network).unwrap();
        let params = selector.params();
        let header = MessageHeader::for_network(params, command("version"), b"payload");
        assert_eq!(header.magic, params.message_start);
        assert!(header.matches_network(params));
        for other in Network::ALL.iter().filter(|&&n| n != network) {
            assert!(!header.matches_network(selector.params_for(*other)));
        }
    }
}

#[test]
fn sealed_after_apply() {
    let (selector, checkpoints) = fresh();
    NodeConfig::default().apply(&selector, &checkpoints).unwrap();
    assert!(matches!(selector.select(Network::Testnet), Err(ParamsError::SelectionSealed(Network::Main))));
}

#[test]
fn global_handles_agree() {
    let handle = network_selector::init();
    let global = zija_node_rust::checkpoints();
    assert_eq!(global.selector().network(), handle.network());
    assert_eq!(zija_node_rust::params().network, handle.network());
    assert_eq!(
        handle.params_for(Network::Main).hash_genesis_block,
        handle.params_for(Network::Testnet).hash_genesis_block
    );
}
