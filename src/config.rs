// zija_node_rust/src/config.rs
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::blockchain::checkpoints::Checkpoints;
use crate::chainparams::{ChainParams, Network};
use crate::error::ConfigError;
use crate::network_selector::NetworkSelector;

pub const ENV_PREFIX: &str = "ZIJA";
pub const DEFAULT_API_LISTEN_ADDR: &str = "0.0.0.0:3001";
pub const DEFAULT_DATA_DIR: &str = ".zija";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub testnet: bool,
    pub regtest: bool,
    /// Enforce hardcoded checkpoints.
    pub checkpoints: bool,
    pub api_listen_addr: String,
    pub datadir: PathBuf,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            testnet: false,
            regtest: false,
            checkpoints: true,
            api_listen_addr: DEFAULT_API_LISTEN_ADDR.to_string(),
            datadir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl NodeConfig {
    /// Reads the optional TOML file at `path`, then `ZIJA_*` environment variables on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_sources(path, Environment::with_prefix(ENV_PREFIX))
    }

    pub fn from_sources(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        let config = builder.add_source(env).build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config = Config::builder().add_source(File::from_str(contents, FileFormat::Toml)).build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.api_listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(self.api_listen_addr.clone()))
    }

    /// Data directory for the given network, e.g. `<datadir>/testnet3`.
    pub fn network_data_dir(&self, params: &ChainParams) -> PathBuf {
        if params.data_dir.is_empty() {
            self.datadir.clone()
        } else {
            self.datadir.join(params.data_dir)
        }
    }

    /// Selects the network, sets checkpoint enforcement and seals the selection.
    pub fn apply(&self, selector: &NetworkSelector, checkpoints: &Checkpoints) -> Result<Network, ConfigError> {
        let network = selector.select_from_flags(self.testnet, self.regtest)?;
        checkpoints.set_enabled(self.checkpoints);
        selector.seal();
        Ok(network)
    }
}
