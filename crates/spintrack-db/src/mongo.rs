//! MongoDB client configuration.
//!
//! Connection establishment is lazy in the driver; callers that need a
//! fail-fast startup should follow [`SpinStore::connect`] with
//! [`SpinStore::ping`].
//!
//! [`SpinStore::connect`]: crate::spin_store::SpinStore::connect
//! [`SpinStore::ping`]: crate::spin_store::SpinStore::ping

/// Default database name.
const DEFAULT_DATABASE: &str = "crazytime";

/// Default collection holding one document per spin round.
const DEFAULT_RESULTS_COLLECTION: &str = "results";

/// Default side collection holding the top multiplier event per round.
const DEFAULT_MULTIPLIERS_COLLECTION: &str = "max_multipliers";

/// Configuration for the MongoDB connection.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// MongoDB connection string.
    ///
    /// Change streams require the server to be a replica set member or
    /// mongos, so point this at a replica set URI in production.
    pub uri: String,
    /// Database name.
    pub database: String,
    /// Collection holding spin round documents.
    pub results_collection: String,
    /// Collection holding max-multiplier records.
    pub multipliers_collection: String,
}

impl MongoConfig {
    /// Create a configuration from a connection string with default
    /// database and collection names.
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_owned(),
            database: String::from(DEFAULT_DATABASE),
            results_collection: String::from(DEFAULT_RESULTS_COLLECTION),
            multipliers_collection: String::from(DEFAULT_MULTIPLIERS_COLLECTION),
        }
    }

    /// Set the database name.
    #[must_use]
    pub fn with_database(mut self, name: &str) -> Self {
        self.database = name.to_owned();
        self
    }

    /// Set the spin results collection name.
    #[must_use]
    pub fn with_results_collection(mut self, name: &str) -> Self {
        self.results_collection = name.to_owned();
        self
    }

    /// Set the max-multipliers collection name.
    #[must_use]
    pub fn with_multipliers_collection(mut self, name: &str) -> Self {
        self.multipliers_collection = name.to_owned();
        self
    }
}
