//! Thin MongoDB client used to apply batched counter updates.

use std::sync::Arc;

use bson::Document;
use mongodb::{Client, Collection, Database};
use tracing::{debug, info};

use crate::config::MongoConfig;
use crate::counter::{MetaCounter, MetaQuery};
use crate::error::{MongoError, MongoResult};

/// A MongoDB client bound to one database.
///
/// The driver pools connections internally, so the client is cheap to clone.
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    database: Database,
    config: Arc<MongoConfig>,
}

/// Outcome of flushing a [`MetaCounter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterFlushReport {
    /// Number of `updateMany` calls issued.
    pub batches: usize,
    /// Documents matched across all batches.
    pub matched: u64,
    /// Documents modified across all batches.
    pub modified: u64,
}

impl MongoClient {
    /// Create a new client from configuration.
    pub async fn new(config: MongoConfig) -> MongoResult<Self> {
        let options = config.to_client_options().await?;

        let client = Client::with_options(options)
            .map_err(|e| MongoError::connection(format!("failed to create client: {}", e)))?;

        let database = client.database(&config.database);

        info!(
            uri = %config.uri,
            database = %config.database,
            "MongoDB client created"
        );

        Ok(Self {
            client,
            database,
            config: Arc::new(config),
        })
    }

    /// Create a client configured from `MONGOUTILS_*` environment variables.
    pub async fn from_env() -> MongoResult<Self> {
        Self::new(MongoConfig::from_env()?).await
    }

    /// Get a collection with BSON documents.
    pub fn collection_doc(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }

    /// Get the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Get the underlying MongoDB client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the configuration.
    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    /// Apply one counter batch with a single `updateMany`.
    pub async fn apply_meta_query(&self, query: &MetaQuery) -> MongoResult<(u64, u64)> {
        let filter = query.filter();
        let update = query.update_doc();

        debug!(
            collection = %query.collection,
            documents = query.ids.len(),
            update = %update,
            "Applying counter batch"
        );

        let result = self
            .collection_doc(&query.collection)
            .update_many(filter, update, None)
            .await
            .map_err(MongoError::from)?;

        Ok((result.matched_count, result.modified_count))
    }

    /// Apply every batch of `counter`.
    ///
    /// Batches are sent sequentially; the first failure aborts the flush and
    /// earlier batches stay applied.
    pub async fn apply_counters(&self, counter: &MetaCounter) -> MongoResult<CounterFlushReport> {
        let mut report = CounterFlushReport::default();

        for query in counter.aggregate() {
            let (matched, modified) = self.apply_meta_query(&query).await?;
            report.batches += 1;
            report.matched += matched;
            report.modified += modified;
        }

        info!(
            batches = report.batches,
            matched = report.matched,
            modified = report.modified,
            "Counter batches applied"
        );

        Ok(report)
    }
}
