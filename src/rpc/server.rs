use crate::chain::{Devnet, TxOpts};
use crate::contracts::{Erc20, TokenFarm};
use crate::primitives::{Address, TxHash, U256};
use crate::rpc::handlers::{to_rpc_error, Deployment, FarmApiServer};
use crate::runtime::Receipt;
use crate::utils::{ChainError, METRICS};
use jsonrpsee::core::RpcResult;
use jsonrpsee::server::{Server, ServerHandle};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

/// Serves one deployment on a shared devnet.
#[derive(Clone)]
pub struct FarmRpc {
    chain: Arc<Mutex<Devnet>>,
    deployment: Deployment,
}

impl FarmRpc {
    pub fn new(chain: Arc<Mutex<Devnet>>, deployment: Deployment) -> Self {
        Self { chain, deployment }
    }

    fn farm(&self) -> TokenFarm {
        TokenFarm::at(self.deployment.token_farm)
    }

    fn read<R, F>(&self, f: F) -> RpcResult<R>
    where
        F: FnOnce(&Devnet) -> crate::utils::Result<R>,
    {
        let chain = self.chain.lock();
        f(&chain).map_err(to_rpc_error)
    }

    /// Run a transaction; a reverted one surfaces as an error carrying its reason.
    fn write<F>(&self, method: &str, f: F) -> RpcResult<Receipt>
    where
        F: FnOnce(&mut Devnet) -> crate::utils::Result<Receipt>,
    {
        let mut chain = self.chain.lock();
        let res = f(&mut chain);
        debug!(method, ok = res.is_ok(), block = chain.block_number(), "rpc transaction");
        res.map_err(to_rpc_error)
    }
}

impl FarmApiServer for FarmRpc {
    fn accounts(&self) -> RpcResult<Vec<Address>> {
        Ok(self.chain.lock().accounts().to_vec())
    }

    fn block_number(&self) -> RpcResult<u64> {
        Ok(self.chain.lock().block_number())
    }

    fn deployment(&self) -> RpcResult<Deployment> {
        Ok(self.deployment)
    }

    fn balance_of(&self, token: Address, owner: Address) -> RpcResult<U256> {
        self.read(|c| Erc20::at(token).balance_of(c, owner))
    }

    fn staking_balance(&self, token: Address, user: Address) -> RpcResult<U256> {
        self.read(|c| self.farm().staking_balance(c, token, user))
    }

    fn unique_tokens_staked(&self, user: Address) -> RpcResult<u64> {
        self.read(|c| self.farm().unique_tokens_staked(c, user))
    }

    fn stakers(&self) -> RpcResult<Vec<Address>> {
        self.read(|c| self.farm().all_stakers(c))
    }

    fn user_total_value(&self, user: Address) -> RpcResult<U256> {
        self.read(|c| self.farm().get_user_total_value(c, user))
    }

    fn approve(&self, token: Address, spender: Address, amount: U256, from: Address) -> RpcResult<Receipt> {
        self.write("approve", |c| Erc20::at(token).approve(c, spender, amount, TxOpts::from(from)))
    }

    fn stake_tokens(&self, amount: U256, token: Address, from: Address) -> RpcResult<Receipt> {
        self.write("stakeTokens", |c| self.farm().stake_tokens(c, amount, token, TxOpts::from(from)))
    }

    fn unstake_tokens(&self, token: Address, from: Address) -> RpcResult<Receipt> {
        self.write("unstakeTokens", |c| self.farm().unstake_tokens(c, token, TxOpts::from(from)))
    }

    fn issue_tokens(&self, from: Address) -> RpcResult<Receipt> {
        self.write("issueTokens", |c| self.farm().issue_tokens(c, TxOpts::from(from)))
    }

    fn receipt(&self, hash: TxHash) -> RpcResult<Option<Receipt>> {
        Ok(self.chain.lock().receipt(&hash).cloned())
    }

    fn metrics(&self) -> RpcResult<serde_json::Value> {
        let (counters, gauges) = METRICS.snapshot();
        Ok(serde_json::json!({ "counters": counters, "gauges": gauges }))
    }
}

/// Bind `addr` and serve `rpc` until the returned handle is stopped.
pub async fn start_rpc_server(addr: &str, rpc: FarmRpc) -> anyhow::Result<(SocketAddr, ServerHandle)> {
    let server = Server::builder().build(addr).await?;
    let local = server.local_addr()?;
    let handle = server.start(rpc.into_rpc());
    info!("JSON-RPC listening on {}", local);
    Ok((local, handle))
}

/// Node-side helper: the deployment on `chain`, or an error if there is none.
pub fn require_deployment(chain: &Devnet) -> crate::utils::Result<Deployment> {
    Deployment::discover(chain).ok_or_else(|| ChainError::UnknownContract("TokenFarm".into()))
}
