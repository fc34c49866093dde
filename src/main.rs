//! GameBuddy - server entry point

use anyhow::{Context, Result};
use clap::Parser;
use gamebuddy::cli::{Args, Commands};
use gamebuddy::{logging, server, ServerConfig};
use tracing::{error, info};

fn main() -> Result<()> {
    let args = Args::parse();

    ServerConfig::load_env_file(args.env_file.as_deref())?;
    let config = ServerConfig::from_env()?;

    logging::init(&config.log_level, &config.log_file)?;
    info!(config = ?config, "Configuration loaded");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.threads)
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let outcome = runtime.block_on(async {
        match args.command() {
            Commands::Serve => server::serve(&config).await,
            Commands::BuildIndex => server::load_steamdb(&config).await.map(|db| {
                info!(records = db.len(), "Embedding index is up to date");
            }),
        }
    });

    if let Err(e) = &outcome {
        error!(error = %e, fatal = e.is_fatal(), "GameBuddy exited with error");
    }
    Ok(outcome?)
}
