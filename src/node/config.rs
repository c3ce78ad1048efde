use crate::chain::{Devnet, DevnetConfig, DEFAULT_NETWORK};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable that overrides `[network] default`.
pub const NETWORK_ENV: &str = "FARM_NETWORK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSection {
    pub default: String,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self { default: DEFAULT_NETWORK.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcSection {
    pub bind: String,
}

impl Default for RpcSection {
    fn default() -> Self {
        Self { bind: "127.0.0.1:8545".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { filter: "info".to_string() }
    }
}

/// Top-level configuration, read from `farm-config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    pub network: NetworkSection,
    pub devnet: DevnetConfig,
    pub rpc: RpcSection,
    pub logging: LoggingSection,
}

impl FarmConfig {
    /// Load config from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())
            .with_context(|| format!("reading config {}", path.as_ref().display()))?;
        Self::from_toml_str(&data)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: FarmConfig = toml::from_str(s)?;
        Ok(cfg)
    }

    /// `FARM_NETWORK` if set, else `[network] default`.
    pub fn active_network(&self) -> String {
        std::env::var(NETWORK_ENV)
            .ok()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.network.default.clone())
    }

    pub fn open_devnet(&self, network: &str) -> crate::utils::Result<Devnet> {
        Devnet::new(network, &self.devnet)
    }
}
