//! Supervised change-stream consumer.
//!
//! The watcher runs for the lifetime of the process. It opens the
//! store's filtered change stream, and for every round that just gained
//! a `winners` field it re-fetches the full document (the change record
//! only carries a delta), serializes it once, and publishes it through
//! the hub.
//!
//! A dropped or failed stream is retried forever with exponential
//! backoff; the delay resets after each successful stream open. The
//! spawn handle is returned so the caller can notice if the task ever
//! exits.

use std::sync::Arc;
use std::time::Duration;

use futures::TryStreamExt;
use mongodb::bson::{Bson, Document};
use mongodb::change_stream::ChangeStream;
use mongodb::change_stream::event::ChangeStreamEvent;
use spintrack_db::{SpinStore, StoreError};
use spintrack_types::SpinResult;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::hub::FeedHub;

/// Initial reconnect delay after a stream failure.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Upper bound on the reconnect delay.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// A finalized round captured at the moment `winners` was attached,
/// serialized once for transport and shared across subscriber channels.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// JSON serialization of the full round document.
    pub payload: Arc<str>,
}

/// Background task consuming the winners change stream and publishing
/// into the hub.
pub struct ChangeWatcher {
    store: SpinStore,
    hub: FeedHub<ChangeEvent>,
}

impl ChangeWatcher {
    /// Create a watcher over the given store and hub.
    pub const fn new(store: SpinStore, hub: FeedHub<ChangeEvent>) -> Self {
        Self { store, hub }
    }

    /// Spawn the watcher as a supervised background task.
    ///
    /// The task only finishes if the tokio runtime shuts down; callers
    /// should treat completion of the handle as a fault.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the watch loop, reconnecting with exponential backoff on any
    /// stream failure.
    pub async fn run(self) {
        let mut backoff = INITIAL_BACKOFF;
        loop {
            match self.store.watch_winner_updates().await {
                Ok(stream) => {
                    info!("winners change stream open");
                    backoff = INITIAL_BACKOFF;
                    match self.forward_changes(stream).await {
                        Ok(()) => warn!("winners change stream ended"),
                        Err(e) => warn!(error = %e, "winners change stream failed"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to open winners change stream");
                }
            }

            info!(delay_ms = backoff.as_millis(), "retrying change stream");
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }

    /// Drain one open change stream, publishing each finalized round.
    async fn forward_changes(
        &self,
        mut stream: ChangeStream<ChangeStreamEvent<SpinResult>>,
    ) -> Result<(), FeedError> {
        while let Some(change) = stream.try_next().await.map_err(StoreError::from)? {
            let Some(id) = extract_document_id(change.document_key.as_ref()) else {
                debug!("change event without a document key, skipping");
                continue;
            };

            // The change record carries only the delta; fetch the full
            // current document.
            let Some(round) = self.lookup_round(&id).await else {
                continue;
            };

            let payload = serde_json::to_string(&round)?;
            debug!(game_id = round.game_id, "publishing finalized round");
            let delivered = self.hub.publish(&ChangeEvent {
                payload: payload.into(),
            });
            debug!(delivered, "round fanned out");
        }
        Ok(())
    }

    /// Fetch the full current document for a change notification.
    ///
    /// A missing document (deleted between notification and lookup) and
    /// a failed lookup both yield `None`: a transient read fault must
    /// not tear down the open stream, which stays live for the next
    /// change.
    async fn lookup_round(&self, id: &Bson) -> Option<SpinResult> {
        match self.store.find_by_id(id).await {
            Ok(Some(round)) => Some(round),
            Ok(None) => {
                debug!("round document missing after change, skipping");
                None
            }
            Err(e) => {
                warn!(error = %e, "round lookup failed, keeping stream open");
                None
            }
        }
    }
}

/// Pull the `_id` value out of a change event's document key.
fn extract_document_id(document_key: Option<&Document>) -> Option<Bson> {
    document_key.and_then(|key| key.get("_id")).cloned()
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;
    use mongodb::bson::oid::ObjectId;
    use spintrack_db::MongoConfig;

    use super::*;

    #[tokio::test]
    async fn failed_lookup_is_swallowed() {
        // Unreachable server with a short selection timeout, so the
        // read errors quickly instead of hanging.
        let config = MongoConfig::new(
            "mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=100&connectTimeoutMS=100",
        );
        let store = SpinStore::connect(&config)
            .await
            .unwrap_or_else(|e| panic!("lazy connect must not fail: {e}"));
        let watcher = ChangeWatcher::new(store, FeedHub::new());

        let id = Bson::ObjectId(ObjectId::new());
        assert_eq!(watcher.lookup_round(&id).await, None);
    }

    #[test]
    fn extracts_object_id_from_document_key() {
        let oid = ObjectId::new();
        let key = doc! { "_id": oid };
        assert_eq!(extract_document_id(Some(&key)), Some(Bson::ObjectId(oid)));
    }

    #[test]
    fn missing_key_or_id_yields_none() {
        assert_eq!(extract_document_id(None), None);
        let empty = doc! {};
        assert_eq!(extract_document_id(Some(&empty)), None);
    }
}
