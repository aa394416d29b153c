//! Bazaar Server Binary

use anyhow::{bail, Result};
use bazaar_server::{
    config::{load_config, validate_config},
    telemetry, Server,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "bazaar-server", version, about = "Bazaar marketplace API server")]
struct Args {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(short, long, env = "BAZAAR_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = load_config(args.config)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Err(errors) = validate_config(&config) {
        let reasons: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration: {}", reasons.join("; "));
    }

    telemetry::init(&config.logging)?;

    info!("Starting Bazaar Server v{}", env!("CARGO_PKG_VERSION"));

    let server = Server::new(config).await?;
    server.run().await?;

    info!("Server shutdown complete");
    Ok(())
}
