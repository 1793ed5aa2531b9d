//! openstack-inventory
//!
//! Ansible dynamic inventory script for OpenStack compute instances

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use eyre::WrapErr;
use osinv_client::OpenStackClient;
use osinv_inventory::{HostMode, InventoryCollector};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::Config;

/// Environment variable holding the log filter
const LOG_ENV: &str = "OSINV_LOG";

/// Ansible dynamic inventory for OpenStack
#[derive(Parser, Debug)]
#[command(name = "openstack-inventory", version)]
struct Cli {
    /// List all inventory
    #[arg(long, conflicts_with = "host")]
    list: bool,

    /// Get specific host details
    #[arg(long, value_name = "HOSTNAME")]
    host: Option<String>,

    /// Emit one host per instance network instead of one per instance
    #[arg(long, requires = "list")]
    per_network: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    if cli.host.as_deref().is_some_and(|host| !host.is_empty()) {
        // Host variables already ship in `_meta`, so per-host lookups stay empty
        println!("{{}}");
        return Ok(());
    }

    if !cli.list {
        eprintln!(
            "Usage: {} [--list | --host <hostname>]",
            env!("CARGO_BIN_NAME")
        );
        std::process::exit(1);
    }

    let mut config = Config::load_default(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());

    init_tracing(&config.log_level);

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env file"),
        Err(e) if e.not_found() => {
            debug!("no .env file found, using system environment variables");
        }
        Err(e) => warn!(error = %e, "failed to load .env file"),
    }

    let mode = if cli.per_network {
        HostMode::PerNetwork
    } else {
        HostMode::PerInstance
    };

    let output = list(&config, mode).await?;
    println!("{output}");

    Ok(())
}

/// Build and render the full inventory
async fn list(config: &Config, mode: HostMode) -> Result<String> {
    config
        .inventory
        .validate()
        .wrap_err("failed to create inventory")?;

    let client = OpenStackClient::new(config.cloud.clone())
        .wrap_err("failed to connect to OpenStack")?;
    let collector = InventoryCollector::new(Arc::new(client));

    let document = collector
        .collect(&config.inventory, mode)
        .await
        .wrap_err("error getting inventory")?;

    Ok(document.render()?)
}

/// Log to stderr; stdout carries the inventory
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
