pub mod cli;
pub mod config;
pub mod node;
pub mod service_handle;

pub use cli::run_cli;
pub use config::{FarmConfig, NETWORK_ENV};
pub use node::{Node, NodeConfig, RunningNode, SNAPSHOT_FILE};
pub use service_handle::ServiceHandle;
