//! Runtime module: executes contract transactions against account state.
//!
//! Exposes:
//! - Executor: runs one transaction in an overlay, commits or reverts, emits a Receipt.
//! - runtime_types: ExecutionContext, CallFrame, events and RuntimeError.

pub mod executor;
pub mod runtime_types;

pub use executor::{BlockEnv, Executed, Executor, Receipt, TxStatus};
pub use runtime_types::{require, CallFrame, Event, ExecutionContext, Log, RuntimeError};
