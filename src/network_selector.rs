// zija_node_rust/src/network_selector.rs
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::chainparams::{build_main_params, build_regtest_params, build_testnet_params, ChainParams, Network};
use crate::error::{ConfigError, ParamsError};

/// Holds the three network profiles and which one is active.
///
/// Selection is expected once during startup; `seal` turns any later attempt into an
/// error so the active profile stays fixed while validation threads read it.
#[derive(Debug)]
pub struct NetworkSelector {
    main: ChainParams,
    testnet: ChainParams,
    regtest: ChainParams,
    active: AtomicU8,
    sealed: AtomicBool,
}

impl NetworkSelector {
    pub fn new() -> Result<Self, ParamsError> {
        let main = build_main_params()?;
        let testnet = build_testnet_params(&main)?;
        let regtest = build_regtest_params(&testnet)?;
        Ok(NetworkSelector {
            main,
            testnet,
            regtest,
            active: AtomicU8::new(Network::Main as u8),
            sealed: AtomicBool::new(false),
        })
    }

    pub fn network(&self) -> Network {
        // Only valid discriminants are ever stored.
        match self.active.load(Ordering::Acquire) {
            1 => Network::Testnet,
            2 => Network::Regtest,
            _ => Network::Main,
        }
    }

    pub fn params(&self) -> &ChainParams {
        self.params_for(self.network())
    }

    pub fn params_for(&self, network: Network) -> &ChainParams {
        match network {
            Network::Main => &self.main,
            Network::Testnet => &self.testnet,
            Network::Regtest => &self.regtest,
        }
    }

    pub fn select(&self, network: Network) -> Result<(), ParamsError> {
        if self.is_sealed() {
            let active = self.network();
            log::warn!("Refusing to switch network to {} after startup (active: {})", network, active);
            return Err(ParamsError::SelectionSealed(active));
        }
        self.active.store(network as u8, Ordering::Release);
        log::info!("Selected {} network parameters", network);
        Ok(())
    }

    /// Picks regtest over testnet over main. Both flags together is a user error and
    /// leaves the current selection untouched.
    pub fn select_from_flags(&self, testnet: bool, regtest: bool) -> Result<Network, ConfigError> {
        if testnet && regtest {
            return Err(ConfigError::ConflictingNetworks);
        }
        let network = if regtest {
            Network::Regtest
        } else if testnet {
            Network::Testnet
        } else {
            Network::Main
        };
        self.select(network)?;
        Ok(network)
    }

    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }
}

static NETWORK_SELECTOR: Lazy<Arc<NetworkSelector>> = Lazy::new(|| match NetworkSelector::new() {
    Ok(selector) => Arc::new(selector),
    Err(e) => {
        // Running with a divergent genesis would validate against the wrong chain.
        log::error!("Chain parameter bootstrap failed: {}", e);
        panic!("chain parameter bootstrap failed: {}", e);
    }
});

/// Builds every profile now rather than on first use.
pub fn init() -> Arc<NetworkSelector> {
    Arc::clone(&NETWORK_SELECTOR)
}

pub fn network_selector() -> &'static NetworkSelector {
    &NETWORK_SELECTOR
}

pub fn params() -> &'static ChainParams {
    NETWORK_SELECTOR.params()
}

pub fn select_params(network: Network) -> Result<(), ParamsError> {
    NETWORK_SELECTOR.select(network)
}
