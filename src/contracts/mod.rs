//! Native contracts hosted by the devnet.
//!
//! Each contract module holds three things: its storage struct, the logic
//! functions that run inside an `ExecutionContext`, and a typed handle that
//! callers use to send transactions or make read calls through a `Devnet`.

pub mod aggregator;
pub mod erc20;
pub mod ownable;
pub mod token_farm;

use crate::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use aggregator::{AggregatorStorage, MockV3Aggregator, RoundData};
pub use erc20::{Erc20, Erc20Storage};
pub use ownable::Ownable;
pub use token_farm::{FarmStorage, TokenFarm};

/// Deployable contract types, used for the deployments registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContractKind {
    DappToken,
    MockDai,
    MockWeth,
    MockV3Aggregator,
    TokenFarm,
}

impl ContractKind {
    pub fn name(&self) -> &'static str {
        match self {
            ContractKind::DappToken => "DappToken",
            ContractKind::MockDai => "MockDAI",
            ContractKind::MockWeth => "MockWETH",
            ContractKind::MockV3Aggregator => "MockV3Aggregator",
            ContractKind::TokenFarm => "TokenFarm",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractState {
    Erc20(Erc20Storage),
    PriceFeed(AggregatorStorage),
    TokenFarm(FarmStorage),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContract {
    pub kind: ContractKind,
    pub deployer: Address,
    pub state: ContractState,
}

/// Typed view over one `ContractState` variant.
pub trait ContractStorage: Clone + Sized {
    const NAME: &'static str;

    fn from_state(state: &ContractState) -> Option<&Self>;
    fn into_state(self) -> ContractState;
}

macro_rules! contract_storage {
    ($t:ty, $variant:ident, $name:literal) => {
        impl ContractStorage for $t {
            const NAME: &'static str = $name;

            fn from_state(state: &ContractState) -> Option<&Self> {
                match state {
                    ContractState::$variant(s) => Some(s),
                    _ => None,
                }
            }

            fn into_state(self) -> ContractState {
                ContractState::$variant(self)
            }
        }
    };
}

contract_storage!(Erc20Storage, Erc20, "ERC20 token");
contract_storage!(AggregatorStorage, PriceFeed, "price feed");
contract_storage!(FarmStorage, TokenFarm, "token farm");
