//! Shared application state for the API server.

use spintrack_db::SpinStore;
use spintrack_feed::{ChangeEvent, FeedHub};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. The store serves the REST projections; the hub is the
/// same instance the change watcher publishes into.
#[derive(Clone)]
pub struct AppState {
    /// Typed handle to the spin collections.
    pub store: SpinStore,
    /// Fan-out hub shared with the change watcher.
    pub hub: FeedHub<ChangeEvent>,
}

impl AppState {
    /// Create the application state.
    pub const fn new(store: SpinStore, hub: FeedHub<ChangeEvent>) -> Self {
        Self { store, hub }
    }
}
