//! Node orchestration: open (or restore) the devnet, make sure a farm is
//! deployed, serve it over JSON-RPC and persist the chain on shutdown.

use crate::chain::{Devnet, DevnetConfig};
use crate::node::service_handle::ServiceHandle;
use crate::rpc::{require_deployment, start_rpc_server, FarmRpc};
use crate::scripts::deploy_token_farm_and_dapp_token;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// File under `data_dir` the devnet is persisted to.
pub const SNAPSHOT_FILE: &str = "devnet.snapshot";

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub data_dir: PathBuf,
    pub rpc_addr: String,
    pub network: String,
    pub devnet: DevnetConfig,
}

/// Main Node object
pub struct Node {
    cfg: NodeConfig,
}

/// A started node: its RPC address, the shared chain, and the handle that stops it.
pub struct RunningNode {
    pub rpc_addr: SocketAddr,
    pub chain: Arc<Mutex<Devnet>>,
    pub service: ServiceHandle,
}

impl RunningNode {
    pub async fn shutdown(self) -> Result<()> {
        self.service.shutdown().await
    }
}

impl Node {
    pub fn new(cfg: NodeConfig) -> Self {
        Self { cfg }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.cfg.data_dir.join(SNAPSHOT_FILE)
    }

    /// Restore the snapshot if there is one, else a fresh devnet with the farm deployed.
    fn open_chain(&self) -> Result<Devnet> {
        let path = self.snapshot_path();
        let mut chain = if path.exists() {
            let chain = Devnet::load_snapshot(&path).with_context(|| format!("restoring {}", path.display()))?;
            if chain.network() != self.cfg.network {
                warn!(snapshot = chain.network(), configured = %self.cfg.network, "snapshot network differs from config");
            }
            info!(block = chain.block_number(), "restored devnet from {}", path.display());
            chain
        } else {
            Devnet::new(&self.cfg.network, &self.cfg.devnet)?
        };
        if require_deployment(&chain).is_err() {
            deploy_token_farm_and_dapp_token(&mut chain)?;
        }
        Ok(chain)
    }

    /// Start the node: serve RPC and return a handle for graceful shutdown.
    pub async fn start(self) -> Result<RunningNode> {
        std::fs::create_dir_all(&self.cfg.data_dir)?;
        let chain = self.open_chain()?;
        let deployment = require_deployment(&chain)?;
        let chain = Arc::new(Mutex::new(chain));

        let (mut svc_handle, mut shutdown_rx) = ServiceHandle::new();
        let (rpc_addr, server) = start_rpc_server(&self.cfg.rpc_addr, FarmRpc::new(chain.clone(), deployment)).await?;

        let snapshot = self.snapshot_path();
        let persisted = chain.clone();
        let h: JoinHandle<Result<()>> = tokio::spawn(async move {
            let _ = shutdown_rx.wait_for(|stop| *stop).await;
            info!("rpc server observed shutdown");
            server.stop()?;
            server.stopped().await;
            save(&persisted.lock(), &snapshot)
        });
        svc_handle.attach(h);

        Ok(RunningNode { rpc_addr, chain, service: svc_handle })
    }
}

fn save(chain: &Devnet, path: &Path) -> Result<()> {
    chain.save_snapshot(path)?;
    info!(block = chain.block_number(), "devnet saved to {}", path.display());
    Ok(())
}
