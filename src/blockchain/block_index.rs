// zija_node_rust/src/blockchain/block_index.rs

use crate::blockchain::progress::ChainPositionSample;
use crate::p2p::messages::BlockHeaderData;
use crate::util::Hash256;

/// In-memory entry of the block index, keyed by `hash` in the node's index map.
#[derive(Debug, Clone)]
pub struct BlockIndex {
    pub hash: Hash256,                // Hash of this block header
    pub prev_hash: Option<Hash256>,   // Hash of the previous block header
    pub height: i32,                  // Height of this block in the chain
    pub header: BlockHeaderData,      // The actual header data
    pub tx_count: u64,                // Transactions in this block
    pub chain_tx: u64,                // Transactions from genesis up to and including this block
}

impl BlockIndex {
    pub fn new(header_data: BlockHeaderData, height: i32, prev: Option<&BlockIndex>, tx_count: u64) -> Self {
        let block_hash = header_data.get_hash();
        let chain_tx = prev.map_or(0, |p| p.chain_tx) + tx_count;
        BlockIndex {
            hash: block_hash,
            prev_hash: prev.map(|p| p.hash),
            height,
            header: header_data,
            tx_count,
            chain_tx,
        }
    }

    pub fn get_block_time(&self) -> i64 {
        self.header.timestamp as i64
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_none() && self.height == 0
    }

    pub fn position_sample(&self) -> ChainPositionSample {
        ChainPositionSample { chain_tx: self.chain_tx, time: self.get_block_time() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(nonce: u32, timestamp: u32, prev: Hash256) -> BlockHeaderData {
        BlockHeaderData { version: 1, prev_block_hash: prev, merkle_root: [0u8; 32], timestamp, bits: 0x1e0ffff0, nonce }
    }

    #[test]
    fn chain_tx_accumulates() {
        let genesis = BlockIndex::new(header(0, 100, [0u8; 32]), 0, None, 1);
        assert!(genesis.is_genesis());
        let next = BlockIndex::new(header(1, 160, genesis.hash), 1, Some(&genesis), 3);
        assert!(!next.is_genesis());
        assert_eq!(next.prev_hash, Some(genesis.hash));
        assert_eq!(next.position_sample(), ChainPositionSample { chain_tx: 4, time: 160 });
    }
}
