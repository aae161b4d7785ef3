// zija_node_rust/src/util.rs
use sha2::{Digest, Sha256};

use crate::chainparams::{Base58Type, ChainParams};
use crate::error::ParamsError;

pub type Hash256 = [u8; 32];

pub fn sha256d(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    out
}

/// Parses a uint256 literal as displayed by the reference client (big-endian hex,
/// optional `0x`) into internal little-endian byte order.
pub fn uint256_from_hex(literal: &str) -> Result<Hash256, ParamsError> {
    let trimmed = literal.trim();
    let digits = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed);
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(digits, &mut bytes).map_err(|_| ParamsError::InvalidHash(literal.to_string()))?;
    bytes.reverse();
    Ok(bytes)
}

pub fn uint256_to_hex(hash: &Hash256) -> String {
    let mut display = *hash;
    display.reverse();
    hex::encode(display)
}

pub fn encode_base58check(params: &ChainParams, kind: Base58Type, payload: &[u8]) -> String {
    let prefix = params.base58_prefix(kind);
    let mut data = Vec::with_capacity(prefix.len() + payload.len());
    data.extend_from_slice(prefix);
    data.extend_from_slice(payload);
    bs58::encode(data).with_check().into_string()
}

/// Decodes a Base58Check string and strips the network prefix for `kind`.
pub fn decode_base58check(params: &ChainParams, kind: Base58Type, encoded: &str) -> Result<Vec<u8>, ParamsError> {
    let data = bs58::decode(encoded).with_check(None).into_vec()?;
    let prefix = params.base58_prefix(kind);
    if !data.starts_with(prefix) {
        let found_len = prefix.len().min(data.len());
        return Err(ParamsError::PrefixMismatch {
            expected: hex::encode(prefix),
            found: hex::encode(&data[..found_len]),
        });
    }
    Ok(data[prefix.len()..].to_vec())
}
