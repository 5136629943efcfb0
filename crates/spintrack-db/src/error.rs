//! Error types for the data layer.

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A MongoDB operation failed (connection, query, cursor, or change
    /// stream).
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A configuration value was invalid.
    #[error("configuration error: {0}")]
    Config(String),
}
