//! Typed queries and the change-watch primitive over the spin
//! collections.
//!
//! All read operations are pure functions of the collections' current
//! contents. The one long-lived primitive is
//! [`SpinStore::watch_winner_updates`], which yields a change stream
//! event every time a round document gains a `winners` field.

use futures::stream::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::change_stream::ChangeStream;
use mongodb::change_stream::event::ChangeStreamEvent;
use mongodb::{Client, Collection, Database};
use spintrack_types::{
    GameHistoryResponse, MaxMultiplierRecord, ResultCode, SpinResult, SpinStatistics,
    TOP_SLOT_MISS,
};

use crate::error::StoreError;
use crate::mongo::MongoConfig;
use crate::projections::{compute_spin_statistics, merge_top_multipliers, page_window};

/// Number of multiplier events returned by the top-multipliers query.
const TOP_MULTIPLIERS_LIMIT: i64 = 5;

/// Typed handle to the spin collections.
///
/// Cheap to clone; all clones share the driver's connection pool.
#[derive(Clone)]
pub struct SpinStore {
    db: Database,
    results: Collection<SpinResult>,
    multipliers: Collection<MaxMultiplierRecord>,
}

impl SpinStore {
    /// Build a store from the provided configuration.
    ///
    /// The driver connects lazily; call [`SpinStore::ping`] afterwards
    /// to verify the server is reachable before serving traffic.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] if the connection string cannot be
    /// parsed.
    pub async fn connect(config: &MongoConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.uri).await?;
        let db = client.database(&config.database);
        let results = db.collection::<SpinResult>(&config.results_collection);
        let multipliers = db.collection::<MaxMultiplierRecord>(&config.multipliers_collection);

        tracing::info!(
            database = config.database,
            results = config.results_collection,
            multipliers = config.multipliers_collection,
            "MongoDB store configured"
        );

        Ok(Self {
            db,
            results,
            multipliers,
        })
    }

    /// Round-trip a `ping` command to verify the server is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] if the server does not respond.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        tracing::info!("MongoDB reachable");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Change watch primitive
    // -----------------------------------------------------------------

    /// Open a change stream over the results collection, filtered
    /// server-side to update operations that attached a `winners` field.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] if the stream cannot be opened
    /// (standalone servers without a replica set reject change streams).
    pub async fn watch_winner_updates(
        &self,
    ) -> Result<ChangeStream<ChangeStreamEvent<SpinResult>>, StoreError> {
        let stream = self
            .results
            .watch()
            .pipeline(winners_update_pipeline())
            .await?;
        Ok(stream)
    }

    /// Point lookup of a round document by its store-native id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] on query failure. A missing
    /// document is `Ok(None)`, not an error.
    pub async fn find_by_id(&self, id: &Bson) -> Result<Option<SpinResult>, StoreError> {
        let doc = self.results.find_one(doc! { "_id": id.clone() }).await?;
        Ok(doc)
    }

    // -----------------------------------------------------------------
    // Read queries
    // -----------------------------------------------------------------

    /// Fetch a page of spin history, most recent round first.
    ///
    /// Over-fetches one document past the window to decide
    /// `hasNextPage`; the in-progress head round is stripped on page 0.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] on query failure.
    pub async fn fetch_game_history(
        &self,
        game_id: Option<ResultCode>,
        spins_amount: usize,
        page: u64,
    ) -> Result<GameHistoryResponse, StoreError> {
        let filter = game_id.map_or_else(Document::new, |code| doc! { "result": code.as_str() });
        let skip = page.saturating_mul(u64::try_from(spins_amount).unwrap_or(u64::MAX));
        let limit = i64::try_from(spins_amount).unwrap_or(i64::MAX).saturating_add(1);

        let docs: Vec<SpinResult> = self
            .results
            .find(filter)
            .sort(doc! { "_id": -1 })
            .skip(skip)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok(page_window(docs, spins_amount, page))
    }

    /// Fetch the top multiplier events in a trailing window of `hours`,
    /// merged with their full round documents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] on query failure.
    pub async fn fetch_top_multipliers(&self, hours: i64) -> Result<Vec<SpinResult>, StoreError> {
        let cutoff_epoch_ms =
            chrono::Utc::now().timestamp_millis() - hours.saturating_mul(60 * 60 * 1000);

        let tops: Vec<MaxMultiplierRecord> = self
            .multipliers
            .find(doc! { "gameTime": { "$gte": cutoff_epoch_ms } })
            .sort(doc! { "multiplier": -1 })
            .limit(TOP_MULTIPLIERS_LIMIT)
            .await?
            .try_collect()
            .await?;

        if tops.is_empty() {
            return Ok(Vec::new());
        }

        let game_ids: Vec<&str> = tops.iter().map(|record| record.game_id.as_str()).collect();
        let rounds: Vec<SpinResult> = self
            .results
            .find(doc! { "gameId": { "$in": game_ids } })
            .await?
            .try_collect()
            .await?;

        Ok(merge_top_multipliers(&tops, rounds))
    }

    /// Compute per-code frequency and recency statistics over the most
    /// recent `spins_amount` spins.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] on aggregation failure.
    pub async fn fetch_spin_statistics(
        &self,
        spins_amount: usize,
    ) -> Result<Vec<SpinStatistics>, StoreError> {
        let limit = i64::try_from(spins_amount).unwrap_or(i64::MAX);
        let pipeline = vec![
            doc! { "$match": { "result": { "$exists": true, "$ne": Bson::Null } } },
            doc! { "$sort": { "_id": -1 } },
            doc! { "$limit": limit },
            doc! { "$project": { "result": 1 } },
        ];

        let mut cursor = self.results.aggregate(pipeline).await?;
        let mut recent = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            if let Ok(result) = doc.get_str("result") {
                recent.push(result.to_owned());
            }
        }

        Ok(compute_spin_statistics(&recent, spins_amount))
    }

    /// Fetch rounds where the top slot matched the round's overall
    /// result and actually hit, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] on query failure.
    pub async fn fetch_topslot_rounds(
        &self,
        spins_amount: usize,
    ) -> Result<Vec<SpinResult>, StoreError> {
        let filter = doc! {
            "$expr": {
                "$and": [
                    { "$in": [{ "$type": "$topSlot.result" }, ["string", "int"]] },
                    { "$in": [{ "$type": "$result" }, ["string", "int"]] },
                    { "$ne": ["$topSlot.multiplier", TOP_SLOT_MISS] },
                    { "$eq": ["$topSlot.result", "$result"] },
                ]
            }
        };

        let limit = i64::try_from(spins_amount).unwrap_or(i64::MAX);
        let rounds: Vec<SpinResult> = self
            .results
            .find(filter)
            .sort(doc! { "_id": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok(rounds)
    }
}

/// Aggregation pipeline filtering a change stream to "a `winners` field
/// was added or updated on a round document".
pub fn winners_update_pipeline() -> Vec<Document> {
    vec![doc! {
        "$match": {
            "operationType": "update",
            "updateDescription.updatedFields.winners": { "$exists": true },
        }
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_matches_winner_updates_only() {
        let pipeline = winners_update_pipeline();
        assert_eq!(pipeline.len(), 1);

        let matcher = pipeline[0]
            .get_document("$match")
            .unwrap_or_else(|_| panic!("pipeline stage must be a $match"));
        assert_eq!(matcher.get_str("operationType").ok(), Some("update"));
        assert!(
            matcher
                .get_document("updateDescription.updatedFields.winners")
                .is_ok()
        );
    }
}
