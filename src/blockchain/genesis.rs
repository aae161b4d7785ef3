// zija_node_rust/src/blockchain/genesis.rs
use std::io::Error as IoError;

use crate::p2p::messages::{BlockHeaderData, BlockMessage, TransactionData, TxInRaw, TxOutRaw};

pub const COIN: i64 = 100_000_000;

const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;
const OP_CHECKSIG: u8 = 0xac;

// nBits of the original bitcoin genesis, pushed as the first coinbase item.
const COINBASE_BITS_PUSH: i64 = 486_604_799;
const COINBASE_EXTRA_NONCE: i64 = 4;

/// Fixed inputs of a network's block 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisTemplate {
    pub timestamp_message: &'static str,
    pub reward_pubkey: Vec<u8>,
    pub reward: i64,
    pub version: i32,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

fn script_num(value: i64) -> Vec<u8> {
    if value == 0 { return Vec::new(); }
    let negative = value < 0;
    let mut abs = value.unsigned_abs();
    let mut out = Vec::new();
    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    // Sign bit lives in the top bit of the last byte.
    if out[out.len() - 1] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        let last = out.len() - 1;
        out[last] |= 0x80;
    }
    out
}

fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    match data.len() {
        len if len < OP_PUSHDATA1 as usize => script.push(len as u8),
        len if len <= 0xff => { script.push(OP_PUSHDATA1); script.push(len as u8); }
        len => { script.push(OP_PUSHDATA2); script.extend_from_slice(&(len as u16).to_le_bytes()); }
    }
    script.extend_from_slice(data);
}

pub fn coinbase_script_sig(timestamp_message: &str) -> Vec<u8> {
    let mut script = Vec::new();
    push_data(&mut script, &script_num(COINBASE_BITS_PUSH));
    push_data(&mut script, &script_num(COINBASE_EXTRA_NONCE));
    push_data(&mut script, timestamp_message.as_bytes());
    script
}

pub fn pay_to_pubkey_script(pubkey: &[u8]) -> Vec<u8> {
    let mut script = Vec::with_capacity(pubkey.len() + 2);
    push_data(&mut script, pubkey);
    script.push(OP_CHECKSIG);
    script
}

pub fn create_genesis_block(template: &GenesisTemplate) -> Result<BlockMessage, IoError> {
    let coinbase = TransactionData {
        version: 1,
        time: template.time,
        vin: vec![TxInRaw::coinbase(coinbase_script_sig(template.timestamp_message))],
        vout: vec![TxOutRaw { value: template.reward, script_pubkey: pay_to_pubkey_script(&template.reward_pubkey) }],
        lock_time: 0,
    };

    let mut block = BlockMessage {
        header: BlockHeaderData {
            version: template.version,
            prev_block_hash: [0u8; 32], // Genesis prev_block_hash is null
            merkle_root: [0u8; 32],
            timestamp: template.time,
            bits: template.bits,
            nonce: template.nonce,
        },
        transactions: vec![coinbase],
    };
    block.header.merkle_root = block.calculate_merkle_root()?;
    Ok(block)
}
