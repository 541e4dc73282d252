use std::{fs::File, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use todo_client::{api::ApiClient, cli::Cli, session::SessionStore, tui};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = cli.log_file.as_ref() {
        init_file_logging(path)?;
    }

    let api = ApiClient::new(&cli.client_config()).context("invalid API configuration")?;
    tracing::info!(base_url = %api.base_url(), "starting todo board client");
    tui::run(api, SessionStore::new(&cli.session_file)).await
}

// the terminal belongs to the UI, so logs only go to a file when asked for
fn init_file_logging(path: &std::path::Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
