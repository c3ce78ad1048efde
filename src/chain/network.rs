/// Network names the in-process devnet may run as.
pub const LOCAL_BLOCKCHAIN_ENVIRONMENTS: &[&str] = &["development", "ganache", "ganache-local", "hardhat"];

pub const DEFAULT_NETWORK: &str = "development";

pub fn is_local_network(name: &str) -> bool {
    LOCAL_BLOCKCHAIN_ENVIRONMENTS.contains(&name)
}
