use crate::primitives::TxHash;
use crate::runtime::RuntimeError;
use thiserror::Error;

/// Unified error type for devnet callers.
#[derive(Error, Debug)]
pub enum ChainError {
    /// A transaction or call failed inside the runtime and was rolled back.
    #[error("VirtualMachineError: {reason}")]
    VirtualMachine {
        reason: String,
        tx_hash: Option<TxHash>,
    },

    #[error("no local account at index {0}")]
    UnknownAccount(usize),

    #[error("network `{0}` is not a local development network")]
    UnsupportedNetwork(String),

    #[error("unknown contract `{0}`")]
    UnknownContract(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("state error: {0}")]
    State(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChainError {
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            ChainError::VirtualMachine { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl From<RuntimeError> for ChainError {
    fn from(e: RuntimeError) -> Self {
        ChainError::VirtualMachine { reason: e.reason(), tx_hash: None }
    }
}

/// Convenience alias
pub type Result<T> = std::result::Result<T, ChainError>;
