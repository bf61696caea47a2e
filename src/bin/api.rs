//! Health Tracker API Server
//!
//! Run with: cargo run --bin health-tracker-api
//!
//! # Configuration
//!
//! Read from `--config`, `~/.config/health-tracker/config.toml` or
//! `./config.toml`, then overridden by environment variables:
//! - `HEALTH_TRACKER_API_HOST`: Host to bind to (default: 127.0.0.1)
//! - `HEALTH_TRACKER_API_PORT`: Port to listen on (default: 8083)
//! - `HEALTH_TRACKER_DATA_DIR`: Data directory
//! - `HEALTH_TRACKER_STORAGE_KEY`: Key the entries are stored under
//! - `RUST_LOG`: Log filter (default: from `[logging]`)

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use health_tracker::api::{serve, AppState};
use health_tracker::config::Config;
use health_tracker::logging::init_tracing;
use health_tracker::storage::FileStore;
use health_tracker::tracker::Tracker;

#[derive(Parser)]
#[command(name = "health-tracker-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Health tracker REST API server")]
struct Args {
    /// Config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting Health Tracker API server v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = config.storage.data_path();
    tracing::info!("Data directory: {:?}", data_dir);

    let backend = Arc::new(FileStore::new(data_dir));
    let tracker = Tracker::open(backend, config.storage.key.clone());
    tracing::info!("Loaded {} entries", tracker.entries().len());

    let state = AppState::new(tracker, config.api.clone());
    serve(state, &config.api).await?;

    Ok(())
}
