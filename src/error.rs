// zija_node_rust/src/error.rs
use crate::chainparams::Network;

#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("genesis block hash mismatch on {network}: computed {computed}, expected {expected}")]
    GenesisHashMismatch { network: Network, computed: String, expected: String },

    #[error("genesis merkle root mismatch on {network}: computed {computed}, expected {expected}")]
    GenesisMerkleMismatch { network: Network, computed: String, expected: String },

    #[error("failed to serialize genesis block: {0}")]
    Encode(#[from] std::io::Error),

    #[error("invalid 256-bit hex literal: {0}")]
    InvalidHash(String),

    #[error("invalid alert public key for {network}: {source}")]
    InvalidAlertKey { network: Network, source: secp256k1::Error },

    #[error("unimplemented network: {0}")]
    UnimplementedNetwork(String),

    #[error("network selection is sealed (active network: {0})")]
    SelectionSealed(Network),

    #[error("signature check failed: {0}")]
    Signature(#[from] secp256k1::Error),

    #[error("base58 decode failed: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("address prefix mismatch: expected {expected}, found {found}")]
    PrefixMismatch { expected: String, found: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid combination of -regtest and -testnet")]
    ConflictingNetworks,

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid api listen address {0}")]
    InvalidListenAddr(String),

    #[error(transparent)]
    Params(#[from] ParamsError),
}
