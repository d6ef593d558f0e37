//! Base Account bridge CLI.
//!
//! Runs the wallet pipeline against a JSON-RPC wallet endpoint:
//!
//! ```text
//! base-account-bridge --config bridge.toml connect
//! base-account-bridge --config bridge.toml send --to 0x... --data 0x...
//! base-account-bridge networks
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use base_account_bridge::config::{load_config, BridgeConfig};
use base_account_bridge::observability::{logging, metrics};
use base_account_bridge::sdk::HttpSdkFactory;
use base_account_bridge::{BaseAccountClient, Call, LocalBridge, NetworkId};

#[derive(Parser)]
#[command(name = "base-account-bridge")]
#[command(about = "Connect a Base Account wallet and send sponsored batch calls", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize, connect and resolve the sub-account
    Connect,
    /// Run the pipeline, then submit one call from the sub-account
    Send {
        /// Target contract address
        #[arg(long)]
        to: String,
        /// Hex call data
        #[arg(long, default_value = "0x")]
        data: String,
        /// Chain id override (hex or decimal)
        #[arg(long)]
        chain_id: Option<String>,
    },
    /// Print the supported network table
    Networks,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BridgeConfig::default(),
    };

    logging::init_logging(&config.observability);
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    tracing::info!(
        network = %config.app.network,
        endpoint = config.provider.endpoint.as_deref().unwrap_or("<network rpc>"),
        "base-account-bridge v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    match cli.command {
        Commands::Networks => {
            let table: Vec<_> = NetworkId::ALL
                .into_iter()
                .map(|id| serde_json::json!({ "id": id.as_str(), "network": id.descriptor() }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        Commands::Connect => {
            let client = build_client(&config);
            client.initialize().await?;
            print_status(&client)?;
        }
        Commands::Send { to, data, chain_id } => {
            let client = build_client(&config);
            client.initialize().await?;
            let hash = client
                .send_transaction(vec![Call::new(to, data)], chain_id)
                .await?;
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "hash": hash }))?);
        }
    }

    Ok(())
}

fn build_client(config: &BridgeConfig) -> BaseAccountClient {
    let factory = HttpSdkFactory::new(
        config.provider.endpoint.clone(),
        config.provider.request_timeout_secs.map(Duration::from_secs),
    );
    let bridge = LocalBridge::new(Arc::new(factory), config.app.origin.clone());
    BaseAccountClient::new(config.app.clone(), Arc::new(bridge))
}

fn print_status(client: &BaseAccountClient) -> Result<(), Box<dyn std::error::Error>> {
    let network: Option<serde_json::Value> = client
        .network_info()
        .map(|n| serde_json::from_str(&n))
        .transpose()?;
    let status = serde_json::json!({
        "state": client.state(),
        "network": network,
        "addresses": client.connected_addresses(),
        "subAccount": client.sub_account(),
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
