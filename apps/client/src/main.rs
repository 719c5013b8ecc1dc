mod api_client;
mod commands;
mod config;
mod errors;
mod models;
mod render;
mod state;
mod workflows;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::Cli;
use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first so the log level can come from .env
    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url.clone() {
        config.api_url = api_url;
    }

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "TuneCV client v{} using backend {}",
        env!("CARGO_PKG_VERSION"),
        config.api_url
    );

    let state = AppState::new(config)?;
    commands::run(state, cli.command).await
}
