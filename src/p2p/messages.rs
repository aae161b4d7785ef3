// zija_node_rust/src/p2p/messages.rs
use std::io::{Read, Write, Error as IoError, Cursor};
use byteorder::{LittleEndian, BigEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use crate::chainparams::ChainParams;
use crate::util::sha256d;

pub const NODE_NETWORK: u64 = 1;
// Transactions above this version carry their own timestamp (PoSV).
pub const POW_TX_VERSION: i32 = 1;

pub trait Encodable { fn consensus_encode<W: Write + WriteBytesExt>(&self, w: &mut W) -> Result<usize, IoError>; }
pub trait Decodable: Sized { fn consensus_decode<R: Read + ReadBytesExt>(r: &mut R) -> Result<Self, IoError>; }

/// Builds a null padded 12 byte command name.
pub fn command(name: &str) -> [u8; 12] {
    let mut cmd = [0u8; 12];
    let bytes = name.as_bytes();
    let len = bytes.len().min(12);
    cmd[..len].copy_from_slice(&bytes[..len]);
    cmd
}

pub fn calculate_checksum(payload: &[u8]) -> [u8; 4] {
    let hash = sha256d(payload);
    let mut checksum = [0u8; 4];
    checksum.copy_from_slice(&hash[0..4]);
    checksum
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageHeader { pub magic: [u8; 4], pub command: [u8; 12], pub length: u32, pub checksum: [u8; 4] }

impl MessageHeader {
    pub const SIZE: usize = 24;

    pub fn new(magic: [u8; 4], command: [u8; 12], payload: &[u8]) -> Self {
        Self { magic, command, length: payload.len() as u32, checksum: calculate_checksum(payload) }
    }

    pub fn for_network(params: &ChainParams, command: [u8; 12], payload: &[u8]) -> Self {
        Self::new(params.message_start, command, payload)
    }

    // Frames from another network must be dropped before the payload is read.
    pub fn matches_network(&self, params: &ChainParams) -> bool {
        self.magic == params.message_start
    }
}

impl Encodable for MessageHeader {
    fn consensus_encode<W: Write + WriteBytesExt>(&self, w: &mut W) -> Result<usize, IoError> {
        w.write_all(&self.magic)?;
        w.write_all(&self.command)?;
        w.write_u32::<LittleEndian>(self.length)?;
        w.write_all(&self.checksum)?;
        Ok(Self::SIZE)
    }
}

impl Decodable for MessageHeader {
    fn consensus_decode<R: Read + ReadBytesExt>(r: &mut R) -> Result<Self, IoError> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        let mut command = [0u8; 12];
        r.read_exact(&mut command)?;
        let length = r.read_u32::<LittleEndian>()?;
        let mut checksum = [0u8; 4];
        r.read_exact(&mut checksum)?;
        Ok(Self { magic, command, length, checksum })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetAddr { pub services: u64, pub ip: [u8; 16], pub port: u16 }

impl NetAddr {
    pub fn new(ip: std::net::IpAddr, port: u16, services: u64) -> Self {
        let ip = match ip {
            std::net::IpAddr::V4(v4) => v4.to_ipv6_mapped().octets(),
            std::net::IpAddr::V6(v6) => v6.octets(),
        };
        Self { services, ip, port }
    }
}

impl Encodable for NetAddr {
    fn consensus_encode<W: Write + WriteBytesExt>(&self, w: &mut W) -> Result<usize, IoError> {
        w.write_u64::<LittleEndian>(self.services)?;
        w.write_all(&self.ip)?;
        w.write_u16::<BigEndian>(self.port)?;
        Ok(26)
    }
}

pub fn write_var_int<W: Write + WriteBytesExt>(w: &mut W, n: u64) -> Result<usize, IoError> {
    if n < 0xfd { w.write_u8(n as u8)?; Ok(1) }
    else if n <= 0xffff { w.write_u8(0xfd)?; w.write_u16::<LittleEndian>(n as u16)?; Ok(3) }
    else if n <= 0xffff_ffff { w.write_u8(0xfe)?; w.write_u32::<LittleEndian>(n as u32)?; Ok(5) }
    else { w.write_u8(0xff)?; w.write_u64::<LittleEndian>(n)?; Ok(9) }
}

fn write_var_bytes<W: Write + WriteBytesExt>(w: &mut W, b: &[u8]) -> Result<usize, IoError> {
    let len = write_var_int(w, b.len() as u64)?;
    w.write_all(b)?;
    Ok(len + b.len())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockHeaderData { pub version: i32, pub prev_block_hash: [u8; 32], pub merkle_root: [u8; 32], pub timestamp: u32, pub bits: u32, pub nonce: u32 }

impl BlockHeaderData {
    pub const SIZE: usize = 80;

    pub fn get_hash(&self) -> [u8; 32] {
        let mut bytes = Vec::with_capacity(Self::SIZE);
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(&self.prev_block_hash);
        bytes.extend_from_slice(&self.merkle_root);
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        bytes.extend_from_slice(&self.bits.to_le_bytes());
        bytes.extend_from_slice(&self.nonce.to_le_bytes());
        sha256d(&bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxInRaw {
    pub prev_out_hash: [u8; 32],
    pub prev_out_n: u32,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
}

impl TxInRaw {
    pub fn coinbase(script_sig: Vec<u8>) -> Self {
        TxInRaw { prev_out_hash: [0u8; 32], prev_out_n: u32::MAX, script_sig, sequence: u32::MAX }
    }
}

impl Encodable for TxInRaw {
    fn consensus_encode<W: Write + WriteBytesExt>(&self, writer: &mut W) -> Result<usize, IoError> {
        let mut written = 0;
        writer.write_all(&self.prev_out_hash)?; written += 32;
        writer.write_u32::<LittleEndian>(self.prev_out_n)?; written += 4;
        written += write_var_bytes(writer, &self.script_sig)?;
        writer.write_u32::<LittleEndian>(self.sequence)?; written += 4;
        Ok(written)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxOutRaw { pub value: i64, pub script_pubkey: Vec<u8> }

impl Encodable for TxOutRaw {
    fn consensus_encode<W: Write + WriteBytesExt>(&self, writer: &mut W) -> Result<usize, IoError> {
        writer.write_i64::<LittleEndian>(self.value)?;
        Ok(8 + write_var_bytes(writer, &self.script_pubkey)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionData {
    pub version: i32,
    /// Only serialized when `version > POW_TX_VERSION`.
    pub time: u32,
    pub vin: Vec<TxInRaw>,
    pub vout: Vec<TxOutRaw>,
    pub lock_time: u32,
}

impl TransactionData {
    pub fn get_txid(&self) -> Result<[u8; 32], IoError> {
        let mut w = Cursor::new(Vec::new());
        self.consensus_encode(&mut w)?;
        Ok(sha256d(&w.into_inner()))
    }
}

impl Encodable for TransactionData {
    fn consensus_encode<W: Write + WriteBytesExt>(&self, w: &mut W) -> Result<usize, IoError> {
        let mut written = 0;
        w.write_i32::<LittleEndian>(self.version)?; written += 4;
        if self.version > POW_TX_VERSION {
            w.write_u32::<LittleEndian>(self.time)?; written += 4;
        }
        written += write_var_int(w, self.vin.len() as u64)?;
        for txin in &self.vin { written += txin.consensus_encode(w)?; }
        written += write_var_int(w, self.vout.len() as u64)?;
        for txout in &self.vout { written += txout.consensus_encode(w)?; }
        w.write_u32::<LittleEndian>(self.lock_time)?; written += 4;
        Ok(written)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockMessage { pub header: BlockHeaderData, pub transactions: Vec<TransactionData> }

impl BlockMessage {
    pub fn calculate_merkle_root(&self) -> Result<[u8; 32], IoError> {
        let mut merkle_tree = self.transactions.iter()
            .map(|tx| tx.get_txid())
            .collect::<Result<Vec<[u8; 32]>, IoError>>()?;
        if merkle_tree.is_empty() { return Ok([0u8; 32]); }
        while merkle_tree.len() > 1 {
            if merkle_tree.len() % 2 != 0 {
                if let Some(last_hash) = merkle_tree.last().cloned() { merkle_tree.push(last_hash); }
            }
            merkle_tree = merkle_tree.chunks_exact(2).map(|pair| {
                let mut concat = Vec::with_capacity(64);
                concat.extend_from_slice(&pair[0]);
                concat.extend_from_slice(&pair[1]);
                sha256d(&concat)
            }).collect();
        }
        Ok(merkle_tree[0])
    }
}
