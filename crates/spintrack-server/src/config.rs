//! Configuration for the service binary.
//!
//! All configuration is loaded from environment variables. The server
//! needs to know how to reach MongoDB and where to bind the HTTP
//! listener.

use spintrack_db::MongoConfig;

/// Complete server configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// MongoDB connection and collection names.
    pub mongo: MongoConfig,
    /// Host address the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server listens on.
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `MONGODB_URI` -- MongoDB connection string (must point at a
    ///   replica set for change streams)
    ///
    /// Optional variables:
    /// - `MONGODB_DATABASE` -- database name (default `crazytime`)
    /// - `RESULTS_COLLECTION` -- spin rounds collection (default `results`)
    /// - `MULTIPLIERS_COLLECTION` -- side collection (default `max_multipliers`)
    /// - `HOST` -- bind address (default `0.0.0.0`)
    /// - `PORT` -- listen port (default `8000`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let uri = env_var("MONGODB_URI")?;
        let mut mongo = MongoConfig::new(&uri);

        if let Ok(database) = std::env::var("MONGODB_DATABASE") {
            mongo = mongo.with_database(&database);
        }
        if let Ok(collection) = std::env::var("RESULTS_COLLECTION") {
            mongo = mongo.with_results_collection(&collection);
        }
        if let Ok(collection) = std::env::var("MULTIPLIERS_COLLECTION") {
            mongo = mongo.with_multipliers_collection(&collection);
        }

        let host = std::env::var("HOST").unwrap_or_else(|_| String::from("0.0.0.0"));
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| String::from("8000"))
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("invalid PORT: {e}")))?;

        Ok(Self { mongo, host, port })
    }
}

/// Read a required environment variable.
fn env_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .map_err(|e| ConfigError::Invalid(format!("missing required env var {name}: {e}")))
}

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable was missing or a value failed to parse.
    #[error("configuration error: {0}")]
    Invalid(String),
}
