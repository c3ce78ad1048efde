#![allow(dead_code)]

use tokenfarm::chain::{is_local_network, Devnet};
use tokenfarm::node::FarmConfig;
use tokenfarm::primitives::{to_wei, U256};

/// Network the suite targets, resolved the same way as the CLI: a non-empty
/// `FARM_NETWORK`, else `development`.
pub fn network() -> String {
    FarmConfig::default().active_network()
}

/// A fresh local devnet, or `None` (test skipped) when pointed at a live network.
pub fn local_chain() -> Option<Devnet> {
    let network = network();
    if !is_local_network(&network) {
        eprintln!("skipping: `{}` is not a local network", network);
        return None;
    }
    Some(Devnet::new(&network, &Default::default()).expect("local devnet"))
}

pub fn amount_staked() -> U256 {
    to_wei(1)
}
