//! Common runtime types: ExecutionContext, call frames, events, errors.

use crate::contracts::{ContractKind, ContractStorage, DeployedContract};
use crate::primitives::{Address, U256};
use crate::state::account_db::Account;
use crate::state::AccountCache;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Explicit `require`-style failure with a reason string.
    #[error("revert: {0}")]
    Revert(String),
    #[error("call to non-contract account {0}")]
    NotAContract(Address),
    #[error("contract at {address} is not a {expected}")]
    WrongContract { address: Address, expected: String },
    #[error("arithmetic overflow")]
    Overflow,
    #[error("state access failed: {0}")]
    State(String),
}

impl RuntimeError {
    pub fn revert(reason: impl Into<String>) -> Self {
        RuntimeError::Revert(reason.into())
    }

    /// Reason reported to the caller: the bare string for a revert, else the message.
    pub fn reason(&self) -> String {
        match self {
            RuntimeError::Revert(r) => r.clone(),
            other => other.to_string(),
        }
    }
}

/// `require(cond, reason)`
pub fn require(cond: bool, reason: &str) -> Result<(), RuntimeError> {
    if cond {
        Ok(())
    } else {
        Err(RuntimeError::revert(reason))
    }
}

fn state_err(e: anyhow::Error) -> RuntimeError {
    RuntimeError::State(e.to_string())
}

/// Who is calling which contract. `caller` is `msg.sender`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFrame {
    pub caller: Address,
    pub this: Address,
}

impl CallFrame {
    pub fn new(caller: Address, this: Address) -> Self {
        Self { caller, this }
    }

    /// Frame for a call made by the current contract into `target`.
    pub fn nested(&self, target: Address) -> Self {
        Self { caller: self.this, this: target }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    Transfer { from: Address, to: Address, value: U256 },
    Approval { owner: Address, spender: Address, value: U256 },
    OwnershipTransferred { previous_owner: Address, new_owner: Address },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Log {
    pub address: Address,
    pub event: Event,
}

/// Everything a contract may touch while a transaction runs.
pub struct ExecutionContext {
    state: AccountCache,
    logs: Vec<Log>,
    pub block_number: u64,
    pub timestamp: u64,
    /// transaction sender (`tx.origin`)
    pub origin: Address,
    /// sender nonce consumed by this transaction
    pub nonce: u64,
}

impl ExecutionContext {
    pub fn new(state: AccountCache, block_number: u64, timestamp: u64, origin: Address, nonce: u64) -> Self {
        Self { state, logs: Vec::new(), block_number, timestamp, origin, nonce }
    }

    pub fn kind_of(&mut self, address: Address) -> Result<Option<ContractKind>, RuntimeError> {
        let acc = self.state.get(&address).map_err(state_err)?;
        Ok(acc.and_then(|a| a.contract).map(|c| c.kind))
    }

    /// Copy out the typed storage of the contract at `address`.
    pub fn load<T: ContractStorage>(&mut self, address: Address) -> Result<T, RuntimeError> {
        let contract = self
            .state
            .get(&address)
            .map_err(state_err)?
            .and_then(|a| a.contract)
            .ok_or(RuntimeError::NotAContract(address))?;
        T::from_state(&contract.state)
            .cloned()
            .ok_or_else(|| RuntimeError::WrongContract { address, expected: T::NAME.to_string() })
    }

    /// Write typed storage back to the contract at `address`.
    pub fn save<T: ContractStorage>(&mut self, address: Address, storage: T) -> Result<(), RuntimeError> {
        let mut account = self
            .state
            .get(&address)
            .map_err(state_err)?
            .ok_or(RuntimeError::NotAContract(address))?;
        let contract = account.contract.as_mut().ok_or(RuntimeError::NotAContract(address))?;
        if T::from_state(&contract.state).is_none() {
            return Err(RuntimeError::WrongContract { address, expected: T::NAME.to_string() });
        }
        contract.state = storage.into_state();
        self.state.insert(address, account);
        Ok(())
    }

    /// Place a new contract at `address`.
    pub fn create(&mut self, address: Address, contract: DeployedContract) -> Result<(), RuntimeError> {
        let existing = self.state.get(&address).map_err(state_err)?;
        if existing.as_ref().map(Account::is_contract).unwrap_or(false) {
            return Err(RuntimeError::revert("contract address collision"));
        }
        let nonce = existing.map(|a| a.nonce).unwrap_or(0);
        self.state.insert(address, Account { nonce, contract: Some(contract) });
        Ok(())
    }

    pub fn emit(&mut self, address: Address, event: Event) {
        self.logs.push(Log { address, event });
    }

    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    pub fn into_parts(self) -> (AccountCache, Vec<Log>) {
        (self.state, self.logs)
    }
}
