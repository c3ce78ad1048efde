//! Account selection, mock deployment and contract lookup for scripts and tests.

use crate::chain::{Devnet, TxOpts};
use crate::contracts::{ContractKind, Erc20, MockV3Aggregator};
use crate::primitives::{Address, U256};
use crate::utils::{ChainError, Result};
use std::fmt;
use std::str::FromStr;
use tracing::info;

pub use crate::chain::{is_local_network, LOCAL_BLOCKCHAIN_ENVIRONMENTS};

/// Decimals reported by the mock price feeds.
pub const DECIMALS: u8 = 18;
/// Mock feed answer: $2000 with 18 decimals.
pub const INITIAL_PRICE_FEED_VALUE: i128 = 2_000_000_000_000_000_000_000;

/// `INITIAL_PRICE_FEED_VALUE` as a token amount: the reward for staking one
/// whole token valued by a fresh mock feed.
pub fn initial_value() -> U256 {
    U256::from(INITIAL_PRICE_FEED_VALUE as u128)
}

/// Contracts a script can ask for by name; each is backed by a mock locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockedContract {
    EthUsdPriceFeed,
    DaiUsdPriceFeed,
    FauToken,
    WethToken,
}

impl MockedContract {
    pub const ALL: [MockedContract; 4] = [
        MockedContract::EthUsdPriceFeed,
        MockedContract::DaiUsdPriceFeed,
        MockedContract::FauToken,
        MockedContract::WethToken,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MockedContract::EthUsdPriceFeed => "eth_usd_price_feed",
            MockedContract::DaiUsdPriceFeed => "dai_usd_price_feed",
            MockedContract::FauToken => "fau_token",
            MockedContract::WethToken => "weth_token",
        }
    }

    /// Both feeds share one mock aggregator.
    pub fn mock_kind(&self) -> ContractKind {
        match self {
            MockedContract::EthUsdPriceFeed | MockedContract::DaiUsdPriceFeed => ContractKind::MockV3Aggregator,
            MockedContract::FauToken => ContractKind::MockDai,
            MockedContract::WethToken => ContractKind::MockWeth,
        }
    }
}

impl fmt::Display for MockedContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MockedContract {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| ChainError::UnknownContract(s.to_string()))
    }
}

/// Unlocked devnet account `index` (0 is the deployer).
pub fn get_account(chain: &Devnet, index: usize) -> Result<Address> {
    chain.account(index)
}

/// Deploy the mock price feed and the mock DAI / WETH tokens from account 0.
pub fn deploy_mocks(chain: &mut Devnet, decimals: u8, initial_value: i128) -> Result<()> {
    let account = get_account(chain, 0)?;
    info!("Deploying Mock Price Feed...");
    let feed = MockV3Aggregator::deploy(chain, decimals, initial_value, TxOpts::from(account))?;
    info!("Deployed to {}", feed.address());
    info!("Deploying Mock DAI...");
    let dai = Erc20::deploy_mock_dai(chain, TxOpts::from(account))?;
    info!("Deployed to {}", dai.address());
    info!("Deploying Mock WETH...");
    let weth = Erc20::deploy_mock_weth(chain, TxOpts::from(account))?;
    info!("Deployed to {}", weth.address());
    Ok(())
}

/// Address of the named contract, deploying the mocks first if they are missing.
pub fn get_contract(chain: &mut Devnet, name: &str) -> Result<Address> {
    let wanted: MockedContract = name.parse()?;
    if !is_local_network(chain.network()) {
        return Err(ChainError::UnsupportedNetwork(chain.network().to_string()));
    }
    if chain.latest_deployment(wanted.mock_kind()).is_none() {
        deploy_mocks(chain, DECIMALS, INITIAL_PRICE_FEED_VALUE)?;
    }
    chain
        .latest_deployment(wanted.mock_kind())
        .ok_or_else(|| ChainError::UnknownContract(name.to_string()))
}
