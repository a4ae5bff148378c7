//! Beacon command-line client.
//!
//! Wires the file credential store, the reqwest transport and the query
//! cache into the services, then runs one command.

mod cli;
mod commands;

use anyhow::Result;
use beacon_infrastructure::Settings;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::commands::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load_from(Some(&cli.config), None)?;
    if let Some(api_url) = &cli.api_url {
        settings.api_url.clone_from(api_url);
    }
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), api_url = %settings.api_url, "Starting beacon");

    let context = AppContext::from_settings(&settings)?;
    commands::run(cli, context).await
}
