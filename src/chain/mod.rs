//! The local development chain and the options used to send transactions to it.

pub mod devnet;
pub mod network;

use crate::primitives::Address;

pub use devnet::{Devnet, DevnetConfig};
pub use network::{is_local_network, DEFAULT_NETWORK, LOCAL_BLOCKCHAIN_ENVIRONMENTS};

/// Per-transaction options; `TxOpts::from(account)` selects the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOpts {
    pub from: Address,
}

impl From<Address> for TxOpts {
    fn from(from: Address) -> Self {
        Self { from }
    }
}
