//! 1A2B guessing-game server - entry point.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use one_a_two_b::{AppState, GameEngine, RecordStore, router};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            host,
            records,
        } => serve(host, port, records).await,
        Command::ResetRecords { records } => reset_records(records),
    }
}

/// Run the HTTP game server until interrupted.
async fn serve(host: String, port: u16, records: PathBuf) -> Result<()> {
    let store = RecordStore::new(records)?;
    let engine = GameEngine::new();
    let app = router(AppState {
        engine,
        records: Arc::new(store),
    });

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!(%host, port, "1A2B server listening on http://{}:{}", host, port);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Clear the persisted best records (administrative use).
fn reset_records(records: PathBuf) -> Result<()> {
    let store = RecordStore::new(records)?;
    store.reset()?;
    info!("Best records cleared");
    Ok(())
}
