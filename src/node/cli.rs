use crate::chain::TxOpts;
use crate::node::config::FarmConfig;
use crate::node::{Node, NodeConfig};
use crate::primitives::{format_units, parse_ether, ETHER_DECIMALS};
use crate::scripts::{deploy_token_farm_and_dapp_token, get_account};
use crate::utils::init_logging;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI for the TokenFarm devnet.
#[derive(Parser)]
#[clap(name = "tokenfarm", version)]
pub struct Cli {
    /// Path to the TOML config file
    #[clap(long, default_value = "farm-config.toml")]
    pub config: PathBuf,

    /// Network to run against (overrides FARM_NETWORK and the config file)
    #[clap(long)]
    pub network: Option<String>,

    #[clap(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// List the unlocked devnet accounts
    Accounts,
    /// Deploy DappToken, TokenFarm and the mocks on a fresh devnet
    Deploy {
        /// write the resulting chain to this snapshot file
        #[clap(long)]
        snapshot: Option<PathBuf>,
    },
    /// Deploy, stake DappToken, issue rewards and print the balances
    Demo {
        /// amount of DappToken to stake, in whole tokens
        #[clap(long, default_value = "1")]
        amount: String,
    },
    /// Serve a deployed devnet over JSON-RPC until Ctrl+C
    Node {
        #[clap(long, default_value = "./data")]
        data_dir: PathBuf,

        /// rpc bind address (host:port), defaults to `[rpc] bind`
        #[clap(long)]
        rpc: Option<String>,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let cfg = FarmConfig::load_or_default(&cli.config)?;
    init_logging(&cfg.logging.filter);
    let network = cli.network.clone().unwrap_or_else(|| cfg.active_network());

    match cli.cmd {
        Cmd::Accounts => {
            let chain = cfg.open_devnet(&network)?;
            for (i, a) in chain.accounts().iter().enumerate() {
                println!("{:>2}  {}", i, a);
            }
            Ok(())
        }
        Cmd::Deploy { snapshot } => {
            let mut chain = cfg.open_devnet(&network)?;
            let (farm, dapp) = deploy_token_farm_and_dapp_token(&mut chain)?;
            println!("DappToken  {}", dapp.address());
            println!("TokenFarm  {}", farm.address());
            if let Some(path) = snapshot {
                chain.save_snapshot(&path)?;
                println!("snapshot written to {}", path.display());
            }
            Ok(())
        }
        Cmd::Demo { amount } => {
            let amount = parse_ether(&amount)?;
            let mut chain = cfg.open_devnet(&network)?;
            let (farm, dapp) = deploy_token_farm_and_dapp_token(&mut chain)?;
            let account = get_account(&chain, 0)?;
            let opts = TxOpts::from(account);

            dapp.approve(&mut chain, farm.address(), amount, opts)?;
            farm.stake_tokens(&mut chain, amount, dapp.address(), opts)?;
            let before = dapp.balance_of(&chain, account)?;
            farm.issue_tokens(&mut chain, opts)?;
            let after = dapp.balance_of(&chain, account)?;

            println!("staked       {} DAPP", format_units(amount, ETHER_DECIMALS));
            println!("staked value {} USD", format_units(farm.get_user_total_value(&chain, account)?, ETHER_DECIMALS));
            println!("reward       {} DAPP", format_units(after - before, ETHER_DECIMALS));
            println!("balance      {} DAPP", format_units(after, ETHER_DECIMALS));
            Ok(())
        }
        Cmd::Node { data_dir, rpc } => {
            let config = NodeConfig {
                data_dir,
                rpc_addr: rpc.unwrap_or_else(|| cfg.rpc.bind.clone()),
                network,
                devnet: cfg.devnet.clone(),
            };
            let running = Node::new(config).start().await?;
            println!("serving farm_* JSON-RPC on http://{}", running.rpc_addr);
            tokio::signal::ctrl_c().await?;
            println!("Shutting down node...");
            running.shutdown().await?;
            println!("Node stopped");
            Ok(())
        }
    }
}
