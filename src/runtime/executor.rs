//! Runtime Executor
//!
//! Runs each transaction against a fresh `AccountCache` overlay. A successful
//! run flushes the overlay into the store; a failed run drops it, so a revert
//! leaves contract state exactly as it was. The sender nonce is consumed
//! either way.

use crate::primitives::{Address, TxHash};
use crate::runtime::runtime_types::{Event, ExecutionContext, Log, RuntimeError};
use crate::state::account_db::{Account, AccountStore};
use crate::state::AccountCache;
use crate::utils::metrics::{METRICS, TX_REVERTED, TX_SUCCESS};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Success,
    Reverted,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub from: Address,
    pub to: Option<Address>,
    pub contract_address: Option<Address>,
    pub nonce: u64,
    pub status: TxStatus,
    pub revert_reason: Option<String>,
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        self.status == TxStatus::Success
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.logs.iter().map(|l| &l.event)
    }
}

/// Block the transaction is mined into.
#[derive(Debug, Clone, Copy)]
pub struct BlockEnv {
    pub number: u64,
    pub timestamp: u64,
}

/// Outcome of `Executor::transact`: always a receipt, plus the call result.
pub struct Executed<R> {
    pub receipt: Receipt,
    pub outcome: std::result::Result<R, RuntimeError>,
}

pub struct Executor {
    store: Arc<dyn AccountStore>,
}

impl Executor {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Increment `from`'s nonce directly in the store, returning the value consumed.
    fn consume_nonce(&self, from: &Address) -> Result<u64> {
        let mut account = self.store.get(from)?.unwrap_or_else(Account::external);
        let nonce = account.nonce;
        account.nonce = nonce.checked_add(1).ok_or_else(|| anyhow::anyhow!("nonce overflow for {}", from))?;
        self.store.insert(*from, account)?;
        Ok(nonce)
    }

    /// Execute a state-changing transaction from `from` addressed to `to`
    /// (`None` for contract creation).
    pub fn transact<R, F>(&self, from: Address, to: Option<Address>, block: BlockEnv, f: F) -> Result<Executed<R>>
    where
        F: FnOnce(&mut ExecutionContext) -> std::result::Result<R, RuntimeError>,
    {
        let nonce = self.consume_nonce(&from)?;
        let to_bytes = to.unwrap_or(Address::ZERO);
        let tx_hash = TxHash::compute(&[
            from.as_bytes(),
            &nonce.to_be_bytes(),
            to_bytes.as_bytes(),
            &block.number.to_be_bytes(),
        ]);

        let overlay = AccountCache::new(self.store.clone());
        let mut ctx = ExecutionContext::new(overlay, block.number, block.timestamp, from, nonce);
        let outcome = f(&mut ctx);
        let (overlay, logs) = ctx.into_parts();

        let receipt = match &outcome {
            Ok(_) => {
                let written = overlay.flush()?;
                METRICS.inc_counter(TX_SUCCESS);
                debug!(%tx_hash, %from, block = block.number, written, "transaction committed");
                Receipt {
                    tx_hash,
                    block_number: block.number,
                    from,
                    to,
                    contract_address: None,
                    nonce,
                    status: TxStatus::Success,
                    revert_reason: None,
                    logs,
                }
            }
            Err(e) => {
                drop(overlay);
                METRICS.inc_counter(TX_REVERTED);
                warn!(%tx_hash, %from, block = block.number, "transaction reverted: {}", e);
                Receipt {
                    tx_hash,
                    block_number: block.number,
                    from,
                    to,
                    contract_address: None,
                    nonce,
                    status: TxStatus::Reverted,
                    revert_reason: Some(e.reason()),
                    logs: Vec::new(),
                }
            }
        };

        Ok(Executed { receipt, outcome })
    }

    /// Read-only call: runs against an overlay that is always discarded.
    pub fn call<R, F>(&self, origin: Address, block: BlockEnv, f: F) -> std::result::Result<R, RuntimeError>
    where
        F: FnOnce(&mut ExecutionContext) -> std::result::Result<R, RuntimeError>,
    {
        let overlay = AccountCache::new(self.store.clone());
        let nonce = self
            .store
            .get(&origin)
            .map_err(|e| RuntimeError::State(e.to_string()))?
            .map(|a| a.nonce)
            .unwrap_or(0);
        let mut ctx = ExecutionContext::new(overlay, block.number, block.timestamp, origin, nonce);
        f(&mut ctx)
    }
}
