//! dropshipd — the dropship daemon.
//!
//! Serves the deployment API over HTTP. Runs against the hosting platform
//! unless `DROPSHIP_SIMULATE` is set.
//!
//! # Usage
//!
//! ```text
//! dropshipd --config dropship.toml --port 3000
//! ```

use std::path::PathBuf;

use clap::Parser;
use dropship_core::{DeployMode, DropshipConfig};

#[derive(Parser)]
#[command(name = "dropshipd", about = "dropship deployment API daemon")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides `[server] port`).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,dropship=debug")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = DropshipConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    dropshipd::serve(config, DeployMode::from_env()).await
}
