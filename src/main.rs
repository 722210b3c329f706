#![warn(clippy::all, clippy::pedantic)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use hostshift::Config;
use hostshift::cli::{Cli, dispatch};

#[tokio::main]
async fn main() -> Result<()> {
    // Install default crypto provider for Rustls TLS.
    // Both reqwest and tokio-tungstenite pull in rustls; without an explicit
    // provider the process-level choice is ambiguous.
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: Failed to install default crypto provider: {e:?}");
    }

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = Config::load_or_init(cli.config.as_deref())?;
    dispatch(cli.command, config).await
}
