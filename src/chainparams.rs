// zija_node_rust/src/chainparams.rs
//! Per-network consensus constants.
//!
//! Testnet is built by copying the main profile and overwriting the fields that
//! differ; regtest is built the same way from testnet. Every profile is a flat value
//! once built and is never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use primitive_types::U256;
use secp256k1::{ecdsa::Signature, Message as SecpMessage, PublicKey, Secp256k1};
use serde::{Deserialize, Serialize};

use crate::blockchain::genesis::{create_genesis_block, GenesisTemplate, COIN};
use crate::error::ParamsError;
use crate::p2p::messages::BlockMessage;
use crate::p2p::seeds::{fixed_seeds, DnsSeedData, SeedAddress, MAINNET_FIXED_SEEDS};
use crate::util::{sha256d, uint256_from_hex, uint256_to_hex, Hash256};

const GENESIS_HASH: &str = "0xbe3ccf25f79bc3c8832bde8c0081cc28c88736f91ae9648879af9ae31a470ef8";
const GENESIS_MERKLE_ROOT: &str = "0xbc921214f9688340097ea0bf9fdf912e4fe5b7f3d3cb5cf2c863fc9280704138";

const GENESIS_TIMESTAMP_MESSAGE: &str = "July 26st 2018 was just perfect day...";
const GENESIS_REWARD_PUBKEY: &str = "040184710fa689ad5023690c80f3a49c8f13f8d45b8c857fbcbc8bc4a8e4d3eb4b10f4d4604fa08dce601aaf0f470216fe1b51850b4acf21b179c45070ac7b03a9";
const GENESIS_TIME: u32 = 1532552400;
const GENESIS_BITS: u32 = 0x1e0ffff0;
const GENESIS_NONCE: u32 = 3207966;

const MAINNET_ALERT_KEY: &str = "0437b4b0f5d356f205c17ffff6c46dc9ec4680ffb7f8a9a4e6eebcebd5f340d01df00ef304faea7779d97d8f1addbe1e87308ea237aae3ead96e0a736c7e9477a1";
const TESTNET_ALERT_KEY: &str = "048b75ab041ee9965f6f57ee299395c02daf5105f208fc49e908804aad3ace5a77c7f87b3aae74d6698124f20c3d1bea31c9fcdd350c9c61c0113fd988ecfb5c09";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Main,
    Testnet,
    Regtest,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Main, Network::Testnet, Network::Regtest];

    pub fn id(&self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Testnet => "test",
            Network::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Network {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(Network::Main),
            "test" | "testnet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(ParamsError::UnimplementedNetwork(other.to_string())),
        }
    }
}

impl TryFrom<u8> for Network {
    type Error = ParamsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Network::Main),
            1 => Ok(Network::Testnet),
            2 => Ok(Network::Regtest),
            other => Err(ParamsError::UnimplementedNetwork(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Base58Type {
    PubkeyAddress = 0,
    ScriptAddress = 1,
    SecretKey = 2,
    ExtPublicKey = 3,
    ExtSecretKey = 4,
}

impl Base58Type {
    pub const ALL: [Base58Type; 5] = [
        Base58Type::PubkeyAddress,
        Base58Type::ScriptAddress,
        Base58Type::SecretKey,
        Base58Type::ExtPublicKey,
        Base58Type::ExtSecretKey,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainParams {
    pub network: Network,
    pub network_id: &'static str,
    /// Wire message start; every frame on this network is prefixed with it.
    pub message_start: [u8; 4],
    pub alert_pub_key: Vec<u8>,
    pub default_port: u16,
    pub rpc_port: u16,
    pub pow_limit: U256,
    pub pos_limit: U256,
    pub subsidy_halving_interval: i32,
    /// Last height at which proof-of-work blocks are accepted.
    pub last_pow_height: i32,
    pub stake_min_age: i64,
    pub stake_max_age: i64,
    pub genesis_template: GenesisTemplate,
    pub genesis: BlockMessage,
    pub hash_genesis_block: Hash256,
    pub expected_genesis_hash: Hash256,
    pub expected_genesis_merkle_root: Hash256,
    pub data_dir: &'static str,
    pub dns_seeds: Vec<DnsSeedData>,
    pub fixed_seeds: Vec<SeedAddress>,
    pub base58_prefixes: [Vec<u8>; 5],
    pub require_rpc_password: bool,
}

impl ChainParams {
    pub fn base58_prefix(&self, kind: Base58Type) -> &[u8] {
        &self.base58_prefixes[kind as usize]
    }

    pub fn genesis_block(&self) -> &BlockMessage {
        &self.genesis
    }

    pub fn is_proof_of_work_height(&self, height: i32) -> bool {
        height <= self.last_pow_height
    }

    fn rebuild_genesis(&mut self) -> Result<(), ParamsError> {
        self.genesis = create_genesis_block(&self.genesis_template)?;
        self.hash_genesis_block = self.genesis.header.get_hash();
        Ok(())
    }

    /// Checks the computed genesis hash and merkle root against the hardcoded values.
    pub fn validate_genesis(&self) -> Result<(), ParamsError> {
        let computed_hash = self.genesis.header.get_hash();
        if computed_hash != self.expected_genesis_hash || computed_hash != self.hash_genesis_block {
            return Err(ParamsError::GenesisHashMismatch {
                network: self.network,
                computed: uint256_to_hex(&computed_hash),
                expected: uint256_to_hex(&self.expected_genesis_hash),
            });
        }
        let computed_root = self.genesis.calculate_merkle_root()?;
        if computed_root != self.expected_genesis_merkle_root || computed_root != self.genesis.header.merkle_root {
            return Err(ParamsError::GenesisMerkleMismatch {
                network: self.network,
                computed: uint256_to_hex(&computed_root),
                expected: uint256_to_hex(&self.expected_genesis_merkle_root),
            });
        }
        Ok(())
    }

    fn validate_alert_key(&self) -> Result<PublicKey, ParamsError> {
        PublicKey::from_slice(&self.alert_pub_key)
            .map_err(|source| ParamsError::InvalidAlertKey { network: self.network, source })
    }

    /// Verifies a DER signature by the network alert key over sha256d(payload).
    pub fn verify_alert_signature(&self, payload: &[u8], signature_der: &[u8]) -> Result<bool, ParamsError> {
        let public_key = self.validate_alert_key()?;
        let signature = Signature::from_der(signature_der)?;
        let message = SecpMessage::from_digest_slice(&sha256d(payload))?;
        let secp = Secp256k1::verification_only();
        match secp.verify_ecdsa(&message, &signature, &public_key) {
            Ok(()) => Ok(true),
            Err(e) => {
                log::warn!("Alert signature INVALID on {}: {}", self.network, e);
                Ok(false)
            }
        }
    }
}

fn decode_hex(literal: &str) -> Result<Vec<u8>, ParamsError> {
    hex::decode(literal).map_err(|_| ParamsError::InvalidHash(literal.to_string()))
}

pub fn build_main_params() -> Result<ChainParams, ParamsError> {
    let genesis_template = GenesisTemplate {
        timestamp_message: GENESIS_TIMESTAMP_MESSAGE,
        reward_pubkey: decode_hex(GENESIS_REWARD_PUBKEY)?,
        reward: 10_000 * COIN,
        version: 1,
        time: GENESIS_TIME,
        bits: GENESIS_BITS,
        nonce: GENESIS_NONCE,
    };
    let genesis = create_genesis_block(&genesis_template)?;
    let default_port = 45591;

    let params = ChainParams {
        network: Network::Main,
        network_id: Network::Main.id(),
        message_start: [0xfb, 0xc0, 0xb6, 0xdb],
        alert_pub_key: decode_hex(MAINNET_ALERT_KEY)?,
        default_port,
        rpc_port: 45592,
        pow_limit: !U256::zero() >> 20,
        pos_limit: !U256::zero() >> 20,
        subsidy_halving_interval: 210_000,
        last_pow_height: 490_000 - 1,
        stake_min_age: 8 * 60 * 60,
        stake_max_age: 45 * 24 * 60 * 60,
        hash_genesis_block: genesis.header.get_hash(),
        genesis_template,
        genesis,
        expected_genesis_hash: uint256_from_hex(GENESIS_HASH)?,
        expected_genesis_merkle_root: uint256_from_hex(GENESIS_MERKLE_ROOT)?,
        data_dir: "",
        dns_seeds: vec![
            DnsSeedData::new("zija.icu", "seed0.zija.icu"),
            DnsSeedData::new("node1.zija.icu", "node1.zija.icu"),
            DnsSeedData::new("node2.zija.icu", "node2.zija.icu"),
            DnsSeedData::new("node3.zija.icu", "node3.zija.icu"),
        ],
        fixed_seeds: fixed_seeds(&MAINNET_FIXED_SEEDS, default_port, Utc::now().timestamp(), &mut rand::thread_rng()),
        base58_prefixes: [
            vec![61],
            vec![5],
            vec![189],
            vec![0x04, 0x88, 0xB2, 0x1E],
            vec![0x04, 0x88, 0xAD, 0xE4],
        ],
        require_rpc_password: true,
    };

    params.validate_genesis()?;
    params.validate_alert_key()?;
    log::debug!("Built {} params, genesis {}", params.network, uint256_to_hex(&params.hash_genesis_block));
    Ok(params)
}

pub fn build_testnet_params(base: &ChainParams) -> Result<ChainParams, ParamsError> {
    let mut params = base.clone();
    params.network = Network::Testnet;
    params.network_id = Network::Testnet.id();
    params.message_start = [0xfe, 0xc3, 0xb9, 0xde];
    params.alert_pub_key = decode_hex(TESTNET_ALERT_KEY)?;
    params.default_port = 46591;
    params.rpc_port = 46592;
    params.data_dir = "testnet3";
    params.last_pow_height = 350 - 1;

    // Testnet keeps mainnet's genesis identity.
    params.genesis_template.time = GENESIS_TIME;
    params.genesis_template.nonce = GENESIS_NONCE;
    params.rebuild_genesis()?;

    params.fixed_seeds.clear();
    params.dns_seeds = vec![
        DnsSeedData::new("testseed1.zija.icu", "testseed1.zija.icu"),
        DnsSeedData::new("testseed2.zija.icu", "testseed2.zija.icu"),
    ];
    params.base58_prefixes = [
        vec![111],
        vec![196],
        vec![239],
        vec![0x04, 0x35, 0x87, 0xCF],
        vec![0x04, 0x35, 0x83, 0x94],
    ];

    params.validate_genesis()?;
    params.validate_alert_key()?;
    log::debug!("Built {} params from {}", params.network, base.network);
    Ok(params)
}

pub fn build_regtest_params(base: &ChainParams) -> Result<ChainParams, ParamsError> {
    let mut params = base.clone();
    params.network = Network::Regtest;
    params.network_id = Network::Regtest.id();
    params.message_start = [0xff, 0xc4, 0xba, 0xdf];
    params.subsidy_halving_interval = 150;
    params.pow_limit = !U256::zero() >> 1;
    params.pos_limit = !U256::zero() >> 1;
    params.last_pow_height = 350 - 1;
    params.default_port = 56444;
    params.rpc_port = 56445;
    params.data_dir = "regtest";

    params.genesis_template.time = GENESIS_TIME;
    params.genesis_template.bits = GENESIS_BITS;
    params.genesis_template.nonce = GENESIS_NONCE;
    params.rebuild_genesis()?;

    // Regtest never does network discovery.
    params.dns_seeds.clear();
    params.require_rpc_password = false;

    params.validate_genesis()?;
    log::debug!("Built {} params from {}", params.network, base.network);
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::SecretKey;
    use std::collections::HashSet;

    fn all_params() -> (ChainParams, ChainParams, ChainParams) {
        let main = build_main_params().unwrap();
        let test = build_testnet_params(&main).unwrap();
        let reg = build_regtest_params(&test).unwrap();
        (main, test, reg)
    }

    #[test]
    fn genesis_matches_hardcoded_digests_on_every_network() {
        let (main, test, reg) = all_params();
        for params in [&main, &test, &reg] {
            assert_eq!(uint256_to_hex(&params.hash_genesis_block), GENESIS_HASH.trim_start_matches("0x"));
            assert_eq!(uint256_to_hex(&params.genesis.header.merkle_root), GENESIS_MERKLE_ROOT.trim_start_matches("0x"));
            assert!(params.validate_genesis().is_ok());
        }
    }

    #[test]
    fn tampered_genesis_is_rejected() {
        let mut params = build_main_params().unwrap();
        params.genesis_template.nonce += 1;
        params.rebuild_genesis().unwrap();
        assert!(matches!(params.validate_genesis(), Err(ParamsError::GenesisHashMismatch { network: Network::Main, .. })));

        let mut params = build_main_params().unwrap();
        params.genesis.transactions[0].vout[0].value += 1;
        assert!(matches!(params.validate_genesis(), Err(ParamsError::GenesisMerkleMismatch { .. })));
    }

    #[test]
    fn magic_and_ports_are_pairwise_distinct() {
        let (main, test, reg) = all_params();
        let magics: HashSet<[u8; 4]> = [&main, &test, &reg].iter().map(|p| p.message_start).collect();
        let ports: HashSet<u16> = [&main, &test, &reg].iter().map(|p| p.default_port).collect();
        let rpc_ports: HashSet<u16> = [&main, &test, &reg].iter().map(|p| p.rpc_port).collect();
        assert_eq!(magics.len(), 3);
        assert_eq!(ports.len(), 3);
        assert_eq!(rpc_ports.len(), 3);
    }

    #[test]
    fn testnet_differs_from_main_only_in_overrides() {
        let (main, test, _) = all_params();
        let mut expected = main.clone();
        expected.network = Network::Testnet;
        expected.network_id = "test";
        expected.message_start = [0xfe, 0xc3, 0xb9, 0xde];
        expected.alert_pub_key = decode_hex(TESTNET_ALERT_KEY).unwrap();
        expected.default_port = 46591;
        expected.rpc_port = 46592;
        expected.data_dir = "testnet3";
        expected.last_pow_height = 349;
        expected.fixed_seeds.clear();
        expected.dns_seeds = vec![
            DnsSeedData::new("testseed1.zija.icu", "testseed1.zija.icu"),
            DnsSeedData::new("testseed2.zija.icu", "testseed2.zija.icu"),
        ];
        expected.base58_prefixes = [
            vec![111],
            vec![196],
            vec![239],
            vec![0x04, 0x35, 0x87, 0xCF],
            vec![0x04, 0x35, 0x83, 0x94],
        ];
        assert_eq!(test, expected);
    }

    #[test]
    fn regtest_differs_from_testnet_only_in_overrides() {
        let (_, test, reg) = all_params();
        let mut expected = test.clone();
        expected.network = Network::Regtest;
        expected.network_id = "regtest";
        expected.message_start = [0xff, 0xc4, 0xba, 0xdf];
        expected.subsidy_halving_interval = 150;
        expected.pow_limit = !U256::zero() >> 1;
        expected.pos_limit = !U256::zero() >> 1;
        expected.default_port = 56444;
        expected.rpc_port = 56445;
        expected.data_dir = "regtest";
        expected.dns_seeds.clear();
        expected.require_rpc_password = false;
        assert_eq!(reg, expected);
        assert!(reg.pow_limit > test.pow_limit);
    }

    #[test]
    fn changed_field_is_caught_by_profile_comparison() {
        let (main, test, _) = all_params();
        let mut drifted = build_testnet_params(&main).unwrap();
        assert_eq!(drifted, test);
        drifted.genesis_template.reward += 1;
        assert_ne!(drifted, test);
    }

    #[test]
    fn main_profile_literals() {
        let main = build_main_params().unwrap();
        assert_eq!(main.message_start, [0xfb, 0xc0, 0xb6, 0xdb]);
        assert_eq!(main.last_pow_height, 489_999);
        assert!(main.is_proof_of_work_height(489_999));
        assert!(!main.is_proof_of_work_height(490_000));
        assert_eq!(main.pow_limit, U256::MAX >> 20);
        assert_eq!(main.fixed_seeds.len(), MAINNET_FIXED_SEEDS.len());
        assert!(main.fixed_seeds.iter().all(|s| s.addr.port() == main.default_port));
        assert_eq!(main.dns_seeds[0].host, "seed0.zija.icu");
        assert_eq!(main.genesis.transactions[0].vout[0].value, 10_000 * COIN);
    }

    #[test]
    fn prefixes_unique_within_each_network() {
        let (main, test, reg) = all_params();
        for params in [&main, &test, &reg] {
            let unique: HashSet<&[u8]> = Base58Type::ALL.iter().map(|k| params.base58_prefix(*k)).collect();
            assert_eq!(unique.len(), Base58Type::ALL.len(), "{}", params.network);
        }
    }

    #[test]
    fn network_parsing() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Main);
        assert_eq!("test".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!(Network::try_from(2u8).unwrap(), Network::Regtest);
        assert!(matches!("signet".parse::<Network>(), Err(ParamsError::UnimplementedNetwork(_))));
        assert!(matches!(Network::try_from(3u8), Err(ParamsError::UnimplementedNetwork(_))));
    }

    #[test]
    fn alert_signature_verification() {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&[0x42; 32]).unwrap();
        let mut params = build_main_params().unwrap();
        params.alert_pub_key = PublicKey::from_secret_key(&secp, &secret).serialize_uncompressed().to_vec();

        let payload = b"network alert: upgrade required";
        let msg = SecpMessage::from_digest_slice(&sha256d(payload)).unwrap();
        let sig = secp.sign_ecdsa(&msg, &secret).serialize_der().to_vec();

        assert!(params.verify_alert_signature(payload, &sig).unwrap());
        assert!(!params.verify_alert_signature(b"tampered", &sig).unwrap());
        assert!(matches!(params.verify_alert_signature(payload, &[0x30, 0x00]), Err(ParamsError::Signature(_))));
    }
}
