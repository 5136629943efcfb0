//! HTTP server lifecycle and watcher supervision.
//!
//! [`start_server`] binds the listener, serves the API, and supervises
//! the change watcher task it is handed. The watcher retries its stream
//! forever, so its handle completing at all means the task died and the
//! live feed is dead with it; rather than keep serving a half-alive API,
//! the server drains the feed hub (ending every open `/events` response)
//! and shuts down gracefully, reporting [`ServerError::WatcherExited`].
//! A termination signal takes the same graceful path without the error.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::router::build_router;
use crate::state::AppState;

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8000,
        }
    }
}

/// Run the API server, supervising the change watcher.
///
/// Serves requests until a termination signal arrives or `watcher`
/// completes. Either way the feed hub is drained first so long-lived
/// `/events` connections finish and graceful shutdown can complete.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind, the server hits a
/// fatal I/O error, or the watcher task exited.
pub async fn start_server(
    config: &ServerConfig,
    state: Arc<AppState>,
    watcher: JoinHandle<()>,
) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let hub = state.hub.clone();
    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "Spintrack API listening");

    let watcher_died = Arc::new(AtomicBool::new(false));
    let shutdown = {
        let watcher_died = Arc::clone(&watcher_died);
        async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("termination signal received");
                }
                result = watcher => {
                    error!(?result, "change watcher task exited");
                    watcher_died.store(true, Ordering::SeqCst);
                }
            }
            // End every feed subscription so open `/events` responses
            // complete and graceful shutdown can finish.
            hub.close_all();
        }
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    if watcher_died.load(Ordering::SeqCst) {
        return Err(ServerError::WatcherExited);
    }

    info!("server stopped");
    Ok(())
}

/// Errors that can occur while starting or running the API server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),

    /// The change watcher task exited, leaving the live feed dead.
    #[error("change watcher task exited")]
    WatcherExited,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use spintrack_db::{MongoConfig, SpinStore};
    use spintrack_feed::FeedHub;

    use super::*;

    async fn test_state() -> Arc<AppState> {
        // The client connects lazily, so no server needs to be running.
        let store = SpinStore::connect(&MongoConfig::new("mongodb://127.0.0.1:27017"))
            .await
            .unwrap_or_else(|e| panic!("lazy connect must not fail: {e}"));
        Arc::new(AppState::new(store, FeedHub::new()))
    }

    #[tokio::test]
    async fn watcher_exit_shuts_the_server_down() {
        let config = ServerConfig {
            host: String::from("127.0.0.1"),
            port: 0,
        };
        // A watcher handle that completes immediately stands in for a
        // dead watcher task.
        let watcher = tokio::spawn(async {});

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            start_server(&config, test_state().await, watcher),
        )
        .await;

        assert!(matches!(result, Ok(Err(ServerError::WatcherExited))));
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        // Occupy a port so the server cannot bind it.
        let taken = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("ephemeral bind must succeed: {e}"));
        let port = taken.local_addr().map(|a| a.port()).unwrap_or_default();

        let config = ServerConfig {
            host: String::from("127.0.0.1"),
            port,
        };
        let watcher = tokio::spawn(std::future::pending::<()>());

        let result = start_server(&config, test_state().await, watcher).await;
        assert!(matches!(result, Err(ServerError::Bind(_))));
    }
}
