// zija_node_rust/src/p2p/seeds.rs
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use rand::Rng;
use serde::Serialize;

use crate::p2p::messages::{NetAddr, NODE_NETWORK};

pub const ONE_WEEK_SECS: i64 = 7 * 24 * 60 * 60;

// Raw IPv4 values as compiled into the reference client, in host byte order.
pub const MAINNET_FIXED_SEEDS: [u32; 8] = [
    0xc6c74b0a, 0x6baafdeb, 0xa2f3d1bc, 0xbce287b5, 0xbce287b8, 0x688361e5, 0xb23e116a, 0x80c789bb,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsSeedData {
    pub name: String,
    pub host: String,
}

impl DnsSeedData {
    pub fn new(name: &str, host: &str) -> Self {
        DnsSeedData { name: name.to_string(), host: host.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedAddress {
    pub addr: SocketAddr,
    pub services: u64,
    pub last_seen: i64,
}

impl SeedAddress {
    pub fn to_net_addr(&self) -> NetAddr {
        NetAddr::new(self.addr.ip(), self.addr.port(), self.services)
    }
}

pub fn seed_ip(raw: u32) -> Ipv4Addr {
    // The reference client memcpy's the u32 into in_addr, so the octets are its LE bytes.
    Ipv4Addr::from(raw.to_le_bytes())
}

/// Converts the compiled-in seed list into peer addresses. Each seed gets a random
/// last-seen time between one and two weeks before `now` so that fresh nodes do not
/// all hit the same seed first; addresses learnt from peers will be newer.
pub fn fixed_seeds<R: Rng + ?Sized>(raw: &[u32], port: u16, now: i64, rng: &mut R) -> Vec<SeedAddress> {
    raw.iter()
        .map(|&ip| SeedAddress {
            addr: SocketAddr::new(IpAddr::V4(seed_ip(ip)), port),
            services: NODE_NETWORK,
            last_seen: now - rng.gen_range(0..ONE_WEEK_SECS) - ONE_WEEK_SECS,
        })
        .collect()
}
