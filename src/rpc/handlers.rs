use crate::chain::Devnet;
use crate::contracts::ContractKind;
use crate::primitives::{Address, TxHash, U256};
use crate::runtime::Receipt;
use crate::utils::ChainError;
use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;
use jsonrpsee::types::error::{ErrorObjectOwned, INTERNAL_ERROR_CODE, INVALID_PARAMS_CODE};
use serde::{Deserialize, Serialize};

/// Error code returned when a transaction or call reverts.
pub const REVERT_CODE: i32 = 3;

/// Addresses of the contracts the node serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub token_farm: Address,
    pub dapp_token: Address,
    pub fau_token: Option<Address>,
    pub weth_token: Option<Address>,
    pub price_feed: Option<Address>,
}

impl Deployment {
    /// The most recent TokenFarm / DappToken pair and mocks on `chain`.
    pub fn discover(chain: &Devnet) -> Option<Self> {
        Some(Self {
            token_farm: chain.latest_deployment(ContractKind::TokenFarm)?,
            dapp_token: chain.latest_deployment(ContractKind::DappToken)?,
            fau_token: chain.latest_deployment(ContractKind::MockDai),
            weth_token: chain.latest_deployment(ContractKind::MockWeth),
            price_feed: chain.latest_deployment(ContractKind::MockV3Aggregator),
        })
    }
}

/// JSON-RPC surface of a running farm node. Methods are exposed as `farm_<name>`.
#[rpc(server, client, namespace = "farm")]
pub trait FarmApi {
    #[method(name = "accounts")]
    fn accounts(&self) -> RpcResult<Vec<Address>>;

    #[method(name = "blockNumber")]
    fn block_number(&self) -> RpcResult<u64>;

    #[method(name = "deployment")]
    fn deployment(&self) -> RpcResult<Deployment>;

    #[method(name = "balanceOf")]
    fn balance_of(&self, token: Address, owner: Address) -> RpcResult<U256>;

    #[method(name = "stakingBalance")]
    fn staking_balance(&self, token: Address, user: Address) -> RpcResult<U256>;

    #[method(name = "uniqueTokensStaked")]
    fn unique_tokens_staked(&self, user: Address) -> RpcResult<u64>;

    #[method(name = "stakers")]
    fn stakers(&self) -> RpcResult<Vec<Address>>;

    #[method(name = "userTotalValue")]
    fn user_total_value(&self, user: Address) -> RpcResult<U256>;

    #[method(name = "approve")]
    fn approve(&self, token: Address, spender: Address, amount: U256, from: Address) -> RpcResult<Receipt>;

    #[method(name = "stakeTokens")]
    fn stake_tokens(&self, amount: U256, token: Address, from: Address) -> RpcResult<Receipt>;

    #[method(name = "unstakeTokens")]
    fn unstake_tokens(&self, token: Address, from: Address) -> RpcResult<Receipt>;

    #[method(name = "issueTokens")]
    fn issue_tokens(&self, from: Address) -> RpcResult<Receipt>;

    #[method(name = "receipt")]
    fn receipt(&self, hash: TxHash) -> RpcResult<Option<Receipt>>;

    #[method(name = "metrics")]
    fn metrics(&self) -> RpcResult<serde_json::Value>;
}

/// Map a devnet error onto a JSON-RPC error object.
pub fn to_rpc_error(err: ChainError) -> ErrorObjectOwned {
    match err {
        ChainError::VirtualMachine { reason, tx_hash } => ErrorObjectOwned::owned(
            REVERT_CODE,
            format!("execution reverted: {}", reason),
            tx_hash.map(|h| h.to_string()),
        ),
        e @ (ChainError::UnknownAccount(_) | ChainError::UnknownContract(_) | ChainError::State(_)) => {
            ErrorObjectOwned::owned(INVALID_PARAMS_CODE, e.to_string(), None::<()>)
        }
        e => ErrorObjectOwned::owned(INTERNAL_ERROR_CODE, e.to_string(), None::<()>),
    }
}
