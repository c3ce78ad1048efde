//! In-process development chain.
//!
//! Automines: every transaction, successful or reverted, becomes its own
//! block. Accounts are derived deterministically from the configured seed, so
//! two devnets built from the same config have identical addresses.

use crate::chain::network::is_local_network;
use crate::contracts::{ContractKind, ContractState, ContractStorage, DeployedContract};
use crate::primitives::{Address, TxHash};
use crate::runtime::executor::BlockEnv;
use crate::runtime::{CallFrame, Executed, ExecutionContext, Executor, Receipt, RuntimeError};
use crate::state::account_db::{Account, AccountStore, InMemAccountStore};
use crate::utils::metrics::{BLOCK_HEIGHT, CONTRACTS_DEPLOYED, METRICS};
use crate::utils::{ChainError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Timestamp of block 0; block `n` is stamped `GENESIS_TIMESTAMP + n`.
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevnetConfig {
    /// number of unlocked accounts created at genesis
    pub accounts: usize,
    /// seed the account addresses are derived from
    pub seed: String,
}

impl Default for DevnetConfig {
    fn default() -> Self {
        Self { accounts: 10, seed: "tokenfarm devnet".to_string() }
    }
}

#[derive(Serialize, Deserialize)]
struct DevnetSnapshot {
    network: String,
    accounts: Vec<Address>,
    block_number: u64,
    receipts: Vec<Receipt>,
    deployments: BTreeMap<ContractKind, Vec<Address>>,
    state: Vec<u8>,
}

fn state_err(e: anyhow::Error) -> ChainError {
    ChainError::State(e.to_string())
}

pub struct Devnet {
    network: String,
    accounts: Vec<Address>,
    store: Arc<InMemAccountStore>,
    executor: Executor,
    block_number: u64,
    receipts: Vec<Receipt>,
    deployments: BTreeMap<ContractKind, Vec<Address>>,
}

impl Devnet {
    /// Open a fresh devnet named `network`. Only local network names are accepted.
    pub fn new(network: &str, cfg: &DevnetConfig) -> Result<Self> {
        if !is_local_network(network) {
            return Err(ChainError::UnsupportedNetwork(network.to_string()));
        }
        if cfg.accounts == 0 {
            return Err(ChainError::State("devnet needs at least one account".into()));
        }
        let chain = Self::genesis(network, cfg);
        info!(network, accounts = chain.accounts.len(), "devnet started");
        Ok(chain)
    }

    /// Fresh `development` devnet with the default config.
    pub fn development() -> Self {
        Self::genesis(crate::chain::DEFAULT_NETWORK, &DevnetConfig::default())
    }

    fn genesis(network: &str, cfg: &DevnetConfig) -> Self {
        let store = Arc::new(InMemAccountStore::new());
        let accounts: Vec<Address> = (0..cfg.accounts as u64)
            .map(|i| Address::derive(&[b"account", cfg.seed.as_bytes(), &i.to_be_bytes()]))
            .collect();
        // Fresh in-memory map: these inserts cannot fail.
        for a in &accounts {
            let _ = store.insert(*a, Account::external());
        }
        Self::assemble(network.to_string(), accounts, store, 0, Vec::new(), BTreeMap::new())
    }

    fn assemble(
        network: String,
        accounts: Vec<Address>,
        store: Arc<InMemAccountStore>,
        block_number: u64,
        receipts: Vec<Receipt>,
        deployments: BTreeMap<ContractKind, Vec<Address>>,
    ) -> Self {
        let executor = Executor::new(store.clone() as Arc<dyn AccountStore>);
        Self { network, accounts, store, executor, block_number, receipts, deployments }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    pub fn account(&self, index: usize) -> Result<Address> {
        self.accounts.get(index).copied().ok_or(ChainError::UnknownAccount(index))
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn nonce(&self, address: &Address) -> Result<u64> {
        Ok(self.store.get(address).map_err(state_err)?.map(|a| a.nonce).unwrap_or(0))
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn receipt(&self, hash: &TxHash) -> Option<&Receipt> {
        self.receipts.iter().find(|r| &r.tx_hash == hash)
    }

    /// Every deployment of `kind`, oldest first.
    pub fn deployments(&self, kind: ContractKind) -> &[Address] {
        self.deployments.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn latest_deployment(&self, kind: ContractKind) -> Option<Address> {
        self.deployments(kind).last().copied()
    }

    pub fn state_root(&self) -> Result<[u8; 32]> {
        self.store.state_root().map_err(state_err)
    }

    fn head(&self) -> BlockEnv {
        BlockEnv { number: self.block_number, timestamp: GENESIS_TIMESTAMP + self.block_number }
    }

    fn next_block(&self) -> BlockEnv {
        let number = self.block_number + 1;
        BlockEnv { number, timestamp: GENESIS_TIMESTAMP + number }
    }

    fn check_sender(&self, from: &Address) -> Result<()> {
        if self.accounts.contains(from) {
            Ok(())
        } else {
            Err(ChainError::State(format!("sender {} is not an unlocked devnet account", from)))
        }
    }

    fn mine(&mut self, receipt: Receipt) {
        self.block_number = receipt.block_number;
        METRICS.set_gauge(BLOCK_HEIGHT, self.block_number as f64);
        self.receipts.push(receipt);
    }

    fn settle<R>(&mut self, executed: Executed<R>) -> Result<(R, Receipt)> {
        let Executed { receipt, outcome } = executed;
        let tx_hash = receipt.tx_hash;
        self.mine(receipt.clone());
        match outcome {
            Ok(value) => Ok((value, receipt)),
            Err(e) => Err(ChainError::VirtualMachine { reason: e.reason(), tx_hash: Some(tx_hash) }),
        }
    }

    /// Deploy a contract of `kind`; `init` is its constructor.
    pub fn deploy<F>(&mut self, from: Address, kind: ContractKind, init: F) -> Result<(Address, Receipt)>
    where
        F: FnOnce(&mut ExecutionContext, CallFrame) -> std::result::Result<ContractState, RuntimeError>,
    {
        self.check_sender(&from)?;
        let block = self.next_block();
        let mut executed = self
            .executor
            .transact(from, None, block, |ctx| {
                let address = Address::contract(&from, ctx.nonce);
                let state = init(ctx, CallFrame::new(from, address))?;
                ctx.create(address, DeployedContract { kind, deployer: from, state })?;
                Ok(address)
            })
            .map_err(state_err)?;

        if let Ok(address) = &executed.outcome {
            executed.receipt.contract_address = Some(*address);
            self.deployments.entry(kind).or_default().push(*address);
            METRICS.inc_counter(CONTRACTS_DEPLOYED);
            info!("{} deployed at {} (block {})", kind, address, block.number);
        }
        self.settle(executed)
    }

    /// Send a state-changing transaction from `from` to the contract at `to`.
    pub fn transact<R, F>(&mut self, from: Address, to: Address, f: F) -> Result<(R, Receipt)>
    where
        F: FnOnce(&mut ExecutionContext, CallFrame) -> std::result::Result<R, RuntimeError>,
    {
        self.check_sender(&from)?;
        let block = self.next_block();
        let executed = self
            .executor
            .transact(from, Some(to), block, |ctx| f(ctx, CallFrame::new(from, to)))
            .map_err(state_err)?;
        self.settle(executed)
    }

    /// Read-only call against the head state, made from the zero address.
    pub fn call<R, F>(&self, to: Address, f: F) -> Result<R>
    where
        F: FnOnce(&mut ExecutionContext, CallFrame) -> std::result::Result<R, RuntimeError>,
    {
        Ok(self
            .executor
            .call(Address::ZERO, self.head(), |ctx| f(ctx, CallFrame::new(Address::ZERO, to)))?)
    }

    /// Read one field out of a contract's typed storage.
    pub fn view<T, R, F>(&self, address: Address, f: F) -> Result<R>
    where
        T: ContractStorage,
        F: FnOnce(&T) -> R,
    {
        self.call(address, |ctx, frame| Ok(f(&ctx.load::<T>(frame.this)?)))
    }

    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let snapshot = DevnetSnapshot {
            network: self.network.clone(),
            accounts: self.accounts.clone(),
            block_number: self.block_number,
            receipts: self.receipts.clone(),
            deployments: self.deployments.clone(),
            state: self.store.encode().map_err(state_err)?,
        };
        let bytes = bincode::serialize(&snapshot).map_err(|e| ChainError::Snapshot(e.to_string()))?;
        std::fs::write(path.as_ref(), bytes)?;
        debug!(path = %path.as_ref().display(), block = self.block_number, "snapshot written");
        Ok(())
    }

    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let snapshot: DevnetSnapshot =
            bincode::deserialize(&bytes).map_err(|e| ChainError::Snapshot(e.to_string()))?;
        if !is_local_network(&snapshot.network) {
            return Err(ChainError::UnsupportedNetwork(snapshot.network));
        }
        let store = Arc::new(InMemAccountStore::new());
        store.restore(&snapshot.state).map_err(|e| ChainError::Snapshot(e.to_string()))?;
        info!(path = %path.as_ref().display(), block = snapshot.block_number, "devnet restored from snapshot");
        Ok(Self::assemble(
            snapshot.network,
            snapshot.accounts,
            store,
            snapshot.block_number,
            snapshot.receipts,
            snapshot.deployments,
        ))
    }
}
