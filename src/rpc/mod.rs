//! JSON-RPC surface over a running devnet (`farm_*` methods).

pub mod handlers;
pub mod server;

pub use handlers::{to_rpc_error, Deployment, FarmApiClient, FarmApiServer, REVERT_CODE};
pub use server::{require_deployment, start_rpc_server, FarmRpc};
