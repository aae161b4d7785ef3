// zija_node_rust/src/lib.rs
pub mod api_service;
pub mod blockchain;
pub mod chainparams;
pub mod config;
pub mod error;
pub mod network_selector;
pub mod p2p;
pub mod util;

pub use blockchain::checkpoints::{checkpoints, CheckpointData, Checkpoints};
pub use blockchain::progress::{guess_verification_progress, ChainPositionSample, SIGCHECK_VERIFICATION_FACTOR};
pub use chainparams::{ChainParams, Network};
pub use error::{ConfigError, ParamsError};
pub use network_selector::{network_selector, params, select_params, NetworkSelector};
