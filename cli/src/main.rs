//! cosigner: operator front-end for the multisig cosigning pipeline.

mod commands;

use clap::Parser;
use std::path::PathBuf;

use cosign_client::SortOrder;
use cosign_core::CosignerConfig;
use cosign_types::NetworkType;
use cosign_utils::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "cosigner", about = "Cosign pending multisig transactions", version)]
struct Cli {
    /// Network selected when nothing is persisted: "mainnet" or "testnet".
    #[arg(long, env = "COSIGNER_NETWORK")]
    network: Option<NetworkType>,

    /// Directory holding the address and node lists.
    #[arg(long, env = "COSIGNER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Bound for REST calls, in milliseconds.
    #[arg(long, env = "COSIGNER_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "COSIGNER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "COSIGNER_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "COSIGNER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
pub enum Command {
    /// Manage account addresses.
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// Manage node endpoints.
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },
    /// Switch the current network; activates its best online node if none is active.
    Network { network: NetworkType },
    /// Pending transactions.
    Tx {
        #[command(subcommand)]
        action: TxAction,
    },
    /// Cosign a transaction hash with the active address on the active node.
    ///
    /// The private key is read from COSIGNER_PRIVATE_KEY, or else one line of stdin.
    Sign { hash: String },
}

#[derive(clap::Subcommand)]
pub enum AddressAction {
    Add {
        address: String,
        #[arg(long, default_value = "")]
        memo: String,
        #[arg(long)]
        active: bool,
    },
    List {
        #[arg(long)]
        active: bool,
        #[arg(long)]
        search: Option<String>,
    },
    Remove { address: String },
    Activate { address: String },
    Memo { address: String, memo: String },
}

#[derive(clap::Subcommand)]
pub enum NodeAction {
    /// Add a node. Without --network the node is asked which network it serves.
    Add {
        url: String,
        #[arg(long)]
        network: Option<NetworkType>,
        #[arg(long, default_value = "")]
        memo: String,
        #[arg(long)]
        active: bool,
    },
    List {
        #[arg(long)]
        network: Option<NetworkType>,
    },
    Remove { id: String },
    Activate { id: String },
    /// Health-check nodes and record the results.
    Check {
        #[arg(long)]
        network: Option<NetworkType>,
    },
    /// Report which network a URL serves without adding it.
    Detect { url: String },
    /// Seed the built-in node list.
    Bootstrap,
}

#[derive(clap::Subcommand)]
pub enum TxAction {
    /// List transactions awaiting cosignature.
    List {
        /// Defaults to the active address.
        #[arg(long)]
        address: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long, value_parser = parse_order, default_value = "desc")]
        order: SortOrder,
        /// Include transactions the address has already signed.
        #[arg(long)]
        all: bool,
    },
}

fn parse_order(s: &str) -> Result<SortOrder, String> {
    match s.to_ascii_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        other => Err(format!("unknown order: {other}")),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<CosignerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            let config = CosignerConfig::from_toml_file(&path)?;
            tracing::debug!("loaded config from {path}");
            config
        }
        None => CosignerConfig::default(),
    };

    if let Some(network) = cli.network {
        config.network = network;
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.request_timeout_ms = timeout_ms;
        config.health_check_timeout_ms = timeout_ms;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level);
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        network = %config.network,
        timeout_ms = config.request_timeout_ms,
        "configuration resolved"
    );

    commands::run(cli.command, &config).await
}
