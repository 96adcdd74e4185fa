//! HTTP server binary for mawrid.

use std::path::PathBuf;

use clap::Parser;
use mawrid::{AppState, MawridConfig, MawridServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Mawrid: AI-assisted meta search server.
#[derive(Parser)]
#[command(name = "mawrid-server", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, env = "MAWRID_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind address.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port (0 picks a free port).
    #[arg(short, long)]
    port: Option<u16>,

    /// Write the default configuration to the config path and exit.
    #[arg(long)]
    write_default_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mawrid=info,mawrid_search=info")),
        )
        .init();

    let cli = Cli::parse();
    let path = cli
        .config
        .clone()
        .unwrap_or_else(MawridConfig::default_config_path);

    if cli.write_default_config {
        MawridConfig::default().save_to_file(&path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    // An explicit --config must exist; the default path is optional.
    let mut config = if cli.config.is_some() || path.exists() {
        info!("loading config from {}", path.display());
        MawridConfig::from_file(&path)?
    } else {
        MawridConfig::default()
    };
    config.apply_env_overrides();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    let server_config = config.server.clone();
    let state = AppState::new(config)?;
    let server = MawridServer::start(state, &server_config).await?;
    println!(
        "{} v{} on http://{}",
        server_config.app_name,
        env!("CARGO_PKG_VERSION"),
        server.addr()
    );

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    server.shutdown();
    Ok(())
}
