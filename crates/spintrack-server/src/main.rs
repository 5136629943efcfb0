//! Service entry point for the Spintrack tracker.
//!
//! Wires the components together: connects to MongoDB (fatal if
//! unreachable at startup), spawns the change watcher publishing into
//! the shared fan-out hub, and serves the HTTP API until terminated or
//! the watcher task dies.
//!
//! # Architecture
//!
//! ```text
//! MongoDB change stream --> ChangeWatcher --> FeedHub --> SSE clients
//!          |
//!          +-- read queries --> REST handlers
//! ```

mod config;

use std::sync::Arc;

use spintrack_api::{AppState, ServerConfig, start_server};
use spintrack_db::SpinStore;
use spintrack_feed::{ChangeWatcher, FeedHub};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Application entry point.
///
/// Initializes logging, loads configuration from environment variables,
/// verifies the store is reachable, then runs the watcher and HTTP
/// server concurrently.
///
/// # Errors
///
/// Returns an error if initialization fails or the server exits
/// abnormally.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("spintrack-server starting");

    // Load configuration from environment
    let config = AppConfig::from_env()?;
    info!(
        database = config.mongo.database,
        results = config.mongo.results_collection,
        host = config.host,
        port = config.port,
        "configuration loaded"
    );

    // Connect to MongoDB; unreachable store at startup is fatal.
    let store = SpinStore::connect(&config.mongo).await?;
    store.ping().await?;

    // Build the fan-out hub and start the change watcher.
    let hub = FeedHub::new();
    let watcher = ChangeWatcher::new(store.clone(), hub.clone());
    let watcher_handle = watcher.spawn();
    info!("change watcher running");

    let state = Arc::new(AppState::new(store, hub));
    let server_config = ServerConfig {
        host: config.host,
        port: config.port,
    };

    // The server supervises the watcher handle: if the watcher task
    // ever exits, the server drains the feed and shuts down with an
    // error this returns to the shell.
    start_server(&server_config, state, watcher_handle).await?;

    Ok(())
}
