// zija_node_rust/src/p2p/mod.rs
pub mod messages;
pub mod seeds;
