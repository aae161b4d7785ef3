// zija_node_rust/src/blockchain/mod.rs
pub mod block_index;
pub mod checkpoints;
pub mod genesis;
pub mod progress;
