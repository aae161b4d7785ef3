// zija_node_rust/src/blockchain/checkpoints.rs
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::blockchain::progress::{self, ChainPositionSample};
use crate::chainparams::Network;
use crate::error::ParamsError;
use crate::network_selector::{self, NetworkSelector};
use crate::util::{uint256_from_hex, uint256_to_hex, Hash256};

/// Bumped whenever an authored table below changes.
pub const CHECKPOINT_REVISION: u32 = 1;

const MAINNET_CHECKPOINTS: [(i32, &str); 23] = [
    (50, "0x104ce025b4bab89d852190b2cb45dcb751587519ce63e1e3e9d5d9f42d873cf6"),
    (250, "0xf28769e7e4fee7095495b3f18e2daf29669c896786d01cbce0d56227dfdd8b39"),
    (3333, "0xd6be96b9a4b7a27cc18067346ae43b5194c282eb3dd9f08c1987220f184cae45"),
    (5555, "0x0ce097e4c579a41e98d61bb8bd88027780b71be98f22cff0dc304e5fdb2fbd07"),
    (8080, "0x79ac9080b65e3723461a5d963e882a1aee55bf35050460ab72bc4bd9cf1b29ac"),
    (12010, "0x0818a0c036c4d7d3e8ee1704b4a511e32ee5dc03bf375b1ce774fa37488ea706"),
    (19000, "0x276a4a5b0759346a8e13181ef4c4eb6944895ef1432ef467a72e36c8ff6f109a"),
    (20800, "0xd5ee24a929796614f2b918fb55546de5aa610dd4fd8edd45bbfd0ffbef355018"),
    (20801, "0x7e5677ee677a953de6ec6eede219f12f8bb97f8f96a1b29377ccb379c45408fe"),
    (20802, "0x80d85806ad5f697859db2352b1c89f76502b393c0235d10f0d1b9452e7b15877"),
    (20803, "0x6692e704361f8d265dbfa5f58bd9e0c7f8e3f3c4c2c7023ec24ac22061ee5ac5"),
    (20804, "0x91a9581bbe5b30ce23c1038aba45335f41e39cdf2f7683fc3eff2e6639c8b910"),
    (20805, "0x3543ba217bb971c88478a50920e4604166a272529cbda618fe0d52821d27a728"),
    (20806, "0x2cfa57ae72a1ff6cff765736f54cbc642004bc425ba7d50a6d0c996faae24915"),
    (20807, "0x0003ad2767426809ad88ee360114e46e33fdd9b7d1bfacfefa97044269214617"),
    (20808, "0x4ac66291835f6f3629f1c2da33985f8a7278d8901820d4e055a72f5d8e32c9d4"),
    (20809, "0xaf4e7f686e73eb34e8d13d0206dec4b2a98e63d9c05f3fc0af524eb61ed7e7fb"),
    (20810, "0xcf20eab4be9b165668108bb9d8c376968e4fcbd8820e9b8894ec99f6b97f6d4e"),
    (20811, "0x942f07d591f3af673b7485379e77ff9f63b629cd3a255e38c3e857f42e47d3bb"),
    (20812, "0xf10e79d97fb69a194b83b4071193b41c5e0c2b5d132528821c65dfaed3f7672d"),
    // Same hash as 12010 in the authored table.
    (20813, "0x0818a0c036c4d7d3e8ee1704b4a511e32ee5dc03bf375b1ce774fa37488ea706"),
    (20814, "0x6e54827eeaee387471a18729089bc8ceb203c08e5d57e182235c672b54cd8f62"),
    (23392, "0xd92e275d760b475788af7c9c1ec467b932f692305cee23e4a2fffe5c8b583e30"),
];

const TESTNET_CHECKPOINTS: [(i32, &str); 1] =
    [(0, "0xbe3ccf25f79bc3c8832bde8c0081cc28c88736f91ae9648879af9ae31a470ef8")];

const REGTEST_CHECKPOINTS: [(i32, &str); 1] =
    [(0, "0x0472dc040de80ded8bd385a2b6bc6e4e05cb6432047efa07692724c6ccef40ac")];

/// Hardcoded checkpoints of one network plus chain activity as of the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointData {
    pub revision: u32,
    pub checkpoints: BTreeMap<i32, Hash256>,
    /// UNIX timestamp of the last checkpoint block.
    pub time_last_checkpoint: i64,
    /// Transactions between genesis and the last checkpoint.
    pub transactions_last_checkpoint: i64,
    /// Estimated transactions per day after the last checkpoint.
    pub transactions_per_day: f64,
}

impl CheckpointData {
    fn from_table(
        table: &[(i32, &str)],
        time_last_checkpoint: i64,
        transactions_last_checkpoint: i64,
        transactions_per_day: f64,
    ) -> Result<Self, ParamsError> {
        let mut checkpoints = BTreeMap::new();
        for &(height, literal) in table {
            checkpoints.insert(height, uint256_from_hex(literal)?);
        }
        Ok(CheckpointData {
            revision: CHECKPOINT_REVISION,
            checkpoints,
            time_last_checkpoint,
            transactions_last_checkpoint,
            transactions_per_day,
        })
    }

    pub fn main() -> Result<Self, ParamsError> {
        Self::from_table(&MAINNET_CHECKPOINTS, 1537512351, 34819, 50000.0)
    }

    pub fn testnet() -> Result<Self, ParamsError> {
        Self::from_table(&TESTNET_CHECKPOINTS, 1456668199, 322625, 2000.0)
    }

    pub fn regtest() -> Result<Self, ParamsError> {
        Self::from_table(&REGTEST_CHECKPOINTS, 1401051600, 1, 10.0)
    }

    pub fn highest_height(&self) -> Option<i32> {
        self.checkpoints.keys().next_back().copied()
    }
}

/// Checkpoint gating against whichever network the selector has active.
#[derive(Debug)]
pub struct Checkpoints {
    selector: Arc<NetworkSelector>,
    main: CheckpointData,
    testnet: CheckpointData,
    regtest: CheckpointData,
    enabled: AtomicBool,
}

impl Checkpoints {
    pub fn new(selector: Arc<NetworkSelector>) -> Result<Self, ParamsError> {
        Ok(Self::with_data(selector, CheckpointData::main()?, CheckpointData::testnet()?, CheckpointData::regtest()?))
    }

    pub fn with_data(
        selector: Arc<NetworkSelector>,
        main: CheckpointData,
        testnet: CheckpointData,
        regtest: CheckpointData,
    ) -> Self {
        Checkpoints { selector, main, testnet, regtest, enabled: AtomicBool::new(true) }
    }

    pub fn selector(&self) -> &NetworkSelector {
        &self.selector
    }

    pub fn data_for(&self, network: Network) -> &CheckpointData {
        match network {
            Network::Main => &self.main,
            Network::Testnet => &self.testnet,
            Network::Regtest => &self.regtest,
        }
    }

    pub fn active_data(&self) -> &CheckpointData {
        self.data_for(self.selector.network())
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
        if !enabled {
            log::info!("Checkpoint enforcement disabled");
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// False only when a checkpoint exists at `height` and `hash` differs from it.
    pub fn check_block(&self, height: i32, hash: &Hash256) -> bool {
        if !self.is_enabled() {
            return true;
        }
        match self.active_data().checkpoints.get(&height) {
            None => true,
            Some(expected) if expected == hash => true,
            Some(expected) => {
                log::warn!(
                    "Block {} at height {} conflicts with checkpoint {}",
                    uint256_to_hex(hash),
                    height,
                    uint256_to_hex(expected)
                );
                false
            }
        }
    }

    pub fn total_blocks_estimate(&self) -> i32 {
        if !self.is_enabled() {
            return 0;
        }
        self.active_data().highest_height().unwrap_or(0)
    }

    /// The most recent checkpoint whose block is present in `block_index`.
    pub fn last_checkpoint<'a, T>(&self, block_index: &'a HashMap<Hash256, T>) -> Option<&'a T> {
        if !self.is_enabled() {
            return None;
        }
        self.active_data()
            .checkpoints
            .values()
            .rev()
            .find_map(|hash| block_index.get(hash))
    }

    /// Progress estimate for status reporting, against the wall clock.
    pub fn guess_verification_progress(&self, sample: Option<&ChainPositionSample>, sigchecks: bool) -> f64 {
        let now = chrono::Utc::now().timestamp();
        progress::guess_verification_progress(self.active_data(), sample, sigchecks, now)
    }
}

static CHECKPOINTS: Lazy<Arc<Checkpoints>> = Lazy::new(|| match Checkpoints::new(network_selector::init()) {
    Ok(checkpoints) => Arc::new(checkpoints),
    Err(e) => {
        log::error!("Checkpoint table failed to load: {}", e);
        panic!("checkpoint table failed to load: {}", e);
    }
});

pub fn checkpoints() -> Arc<Checkpoints> {
    Arc::clone(&CHECKPOINTS)
}
