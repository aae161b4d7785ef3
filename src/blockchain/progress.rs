// zija_node_rust/src/blockchain/progress.rs
use serde::{Deserialize, Serialize};

use crate::blockchain::checkpoints::CheckpointData;

/// Relative cost of a fully verified transaction against one covered by a checkpoint.
pub const SIGCHECK_VERIFICATION_FACTOR: f64 = 5.0;

const SECONDS_PER_DAY: f64 = 86400.0;

/// A point on the chain as seen by the block index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainPositionSample {
    /// Transactions from genesis up to and including this block.
    pub chain_tx: u64,
    pub time: i64,
}

/// Estimated fraction of verification work done at `sample`.
///
/// Work is 1.0 per transaction before the last checkpoint and `factor` per transaction
/// after it, where `factor` is the sigcheck factor when `sigchecks` is set. Work still to
/// come past the known chain is extrapolated from `transactions_per_day`.
pub fn guess_verification_progress(
    data: &CheckpointData,
    sample: Option<&ChainPositionSample>,
    sigchecks: bool,
    now: i64,
) -> f64 {
    let sample = match sample {
        Some(s) => s,
        None => return 0.0,
    };

    let factor = if sigchecks { SIGCHECK_VERIFICATION_FACTOR } else { 1.0 };
    let checkpoint_tx = data.transactions_last_checkpoint as f64;
    let chain_tx = sample.chain_tx as f64;

    let (work_before, work_after) = if chain_tx <= checkpoint_tx {
        let cheap_after = checkpoint_tx - chain_tx;
        let expensive_after = (now - data.time_last_checkpoint) as f64 / SECONDS_PER_DAY * data.transactions_per_day;
        (chain_tx, cheap_after + expensive_after * factor)
    } else {
        let expensive_before = chain_tx - checkpoint_tx;
        let expensive_after = (now - sample.time) as f64 / SECONDS_PER_DAY * data.transactions_per_day;
        (checkpoint_tx + expensive_before * factor, expensive_after * factor)
    };

    let total = work_before + work_after;
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }
    (work_before / total).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn data(time: i64, tx: i64, per_day: f64) -> CheckpointData {
        CheckpointData {
            revision: 1,
            checkpoints: BTreeMap::new(),
            time_last_checkpoint: time,
            transactions_last_checkpoint: tx,
            transactions_per_day: per_day,
        }
    }

    #[test]
    fn no_sample_is_zero() {
        assert_eq!(guess_verification_progress(&data(0, 10, 1.0), None, true, 100), 0.0);
    }

    #[test]
    fn at_checkpoint_is_strictly_between_zero_and_one() {
        let d = data(1_537_512_351, 34_819, 50_000.0);
        let sample = ChainPositionSample { chain_tx: 34_819, time: 1_537_512_351 };
        for sigchecks in [false, true] {
            let p = guess_verification_progress(&d, Some(&sample), sigchecks, 1_537_512_351 + 3600);
            assert!(p > 0.0 && p < 1.0, "progress {}", p);
        }
    }

    #[test]
    fn before_checkpoint_matches_cost_model() {
        // One day after the checkpoint, 100 tx/day: 40 cheap left plus 100 expensive.
        let d = data(0, 100, 100.0);
        let sample = ChainPositionSample { chain_tx: 60, time: 0 };
        let plain = guess_verification_progress(&d, Some(&sample), false, 86_400);
        assert!((plain - 60.0 / 200.0).abs() < 1e-12);
        let weighted = guess_verification_progress(&d, Some(&sample), true, 86_400);
        assert!((weighted - 60.0 / (60.0 + 40.0 + 500.0)).abs() < 1e-12);
    }

    #[test]
    fn after_checkpoint_matches_cost_model() {
        let d = data(0, 100, 100.0);
        let sample = ChainPositionSample { chain_tx: 150, time: 43_200 };
        let weighted = guess_verification_progress(&d, Some(&sample), true, 86_400);
        let before = 100.0 + 50.0 * 5.0;
        let after = 50.0 * 5.0;
        assert!((weighted - before / (before + after)).abs() < 1e-12);
    }

    #[test]
    fn monotonic_in_chain_tx() {
        let d = data(1_000_000, 5_000, 2_000.0);
        let now = 1_000_000 + 10 * 86_400;
        for sigchecks in [false, true] {
            let mut last = 0.0;
            for chain_tx in (0..12_000).step_by(250) {
                let sample = ChainPositionSample { chain_tx, time: 1_200_000 };
                let p = guess_verification_progress(&d, Some(&sample), sigchecks, now);
                assert!(p >= last, "progress dropped at {}: {} < {}", chain_tx, p, last);
                last = p;
            }
        }
    }

    #[test]
    fn degenerate_inputs_stay_in_range() {
        // Empty chain exactly at an empty checkpoint.
        let d = data(500, 0, 10.0);
        let sample = ChainPositionSample { chain_tx: 0, time: 500 };
        assert_eq!(guess_verification_progress(&d, Some(&sample), false, 500), 0.0);

        // Clock behind the sample time.
        let d = data(0, 10, 10.0);
        let sample = ChainPositionSample { chain_tx: 20, time: 1_000_000 };
        let p = guess_verification_progress(&d, Some(&sample), false, 0);
        assert!((0.0..=1.0).contains(&p));
    }
}
