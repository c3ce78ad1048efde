//! Deployment scripts and helpers shared by the CLI, the node and the tests.

pub mod deploy;
pub mod helpful_scripts;

pub use deploy::{add_allowed_tokens, deploy_token_farm_and_dapp_token, kept_balance, KEPT_BALANCE_TOKENS};
pub use helpful_scripts::{
    deploy_mocks, get_account, get_contract, initial_value, is_local_network, MockedContract, DECIMALS,
    INITIAL_PRICE_FEED_VALUE, LOCAL_BLOCKCHAIN_ENVIRONMENTS,
};
