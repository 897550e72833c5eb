/*!
 * BLUEDECK Bluetooth Backend Daemon
 * Answers the quick access panel with raw bluetoothctl output
 * Onyx Digital Intelligence Development LLC
 */

use anyhow::{Context, Result};
use bluedeck_core::parser::parse_bluetooth_status;
use bluedeck_core::{Backend, DaemonClient};
use clap::{Parser, Subcommand};
use std::path::Path;
use tokio::net::UnixListener;
use tracing::info;

mod bluetooth;
mod config;
mod ipc;

use bluetooth::BluetoothManager;
use config::DaemonConfig;
use ipc::IpcServer;

#[derive(Parser)]
#[command(name = "bluedeckd")]
#[command(about = "BLUEDECK Bluetooth Backend Daemon")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "/etc/bluedeck/bluedeckd.toml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daemon
    Run,
    /// Ask a running daemon for the adapter status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("bluedeck_daemon={log_level},bluedeck_core={log_level}"))
        .init();

    // Load configuration
    let config = DaemonConfig::load(&cli.config)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_daemon(config).await,
        Commands::Status => check_status(&config).await,
    }
}

async fn run_daemon(config: DaemonConfig) -> Result<()> {
    info!("BLUEDECK daemon starting...");

    let bluetooth_manager = BluetoothManager::new(&config.bluetooth);

    let socket_path = Path::new(&config.socket_path);
    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    // A previous run may have left its socket behind
    if socket_path.exists() {
        std::fs::remove_file(socket_path)?;
    }

    let listener = UnixListener::bind(socket_path)
        .with_context(|| format!("binding {}", socket_path.display()))?;
    let ipc_server = IpcServer::new(listener, bluetooth_manager);

    info!("BLUEDECK daemon ready on socket: {}", config.socket_path);

    tokio::select! {
        result = ipc_server.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }

    std::fs::remove_file(socket_path).ok();
    Ok(())
}

async fn check_status(config: &DaemonConfig) -> Result<()> {
    let client = DaemonClient::new(&config.socket_path);
    let raw = client
        .get_bluetooth_status()
        .await
        .with_context(|| format!("querying daemon at {}", config.socket_path))?;

    println!("Bluetooth status: {}", parse_bluetooth_status(&raw));
    Ok(())
}
