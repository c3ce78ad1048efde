//! A local development chain running the TokenFarm staking contract, its
//! DappToken reward token, and the mock price feed and ERC-20s it is tested
//! against.

pub mod chain;
pub mod contracts;
pub mod node;
pub mod primitives;
pub mod rpc;
pub mod runtime;
pub mod scripts;
pub mod state;
pub mod utils;
