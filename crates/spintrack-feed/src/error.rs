//! Error types for the fan-out core.

use spintrack_db::StoreError;

/// Errors that can occur inside the change watcher.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// A store operation failed (change stream open/read or point
    /// lookup).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A round document could not be serialized for transport.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
