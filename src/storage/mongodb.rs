//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoPropertyStore`, a [`PropertyStore`] over a single collection
//! (by default `listingsAndReviews` of the sample Airbnb dataset).
//!
//! # Storage model
//!
//! Documents are stored and read back as raw `bson::Document`s; all shape
//! conversions (Decimal128 prices, nested picture URLs, `_id` stringification)
//! happen in [`crate::core::document`], so records imported from the dataset
//! and records created through the API are read by the same code.
//!
//! The driver's `Client` holds its own connection pool and is safe to share
//! between concurrent requests; clone the store freely.

use crate::core::document::ID_FIELD;
use crate::core::error::StorageError;
use crate::core::store::{PropertyStore, UpdateOutcome};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Collection, Database};

const BACKEND: &str = "MongoDB";

/// Property store backed by a MongoDB collection
///
/// # Example
///
/// ```rust,ignore
/// use listings::storage::MongoPropertyStore;
///
/// let store = MongoPropertyStore::connect("mongodb://localhost:27017", "sample_airbnb", "listingsAndReviews").await?;
/// store.ping().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoPropertyStore {
    database: Database,
    collection: Collection<Document>,
}

impl MongoPropertyStore {
    /// Create a store over `collection` in the given database handle.
    pub fn new(database: Database, collection: &str) -> Self {
        Self {
            collection: database.collection(collection),
            database,
        }
    }

    /// Connect to a MongoDB deployment and open the collection.
    pub async fn connect(url: &str, database: &str, collection: &str) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(url)
            .await
            .map_err(|e| StorageError::backend(BACKEND, "connect", e))?;
        Ok(Self::new(client.database(database), collection))
    }

    /// Round-trip a `ping` command to verify the deployment is reachable.
    pub async fn ping(&self) -> Result<(), StorageError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StorageError::backend(BACKEND, "ping", e))?;
        Ok(())
    }
}

#[async_trait]
impl PropertyStore for MongoPropertyStore {
    async fn insert_one(&self, document: Document) -> Result<Bson, StorageError> {
        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|e| StorageError::backend(BACKEND, "insert", e))?;

        Ok(result.inserted_id)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StorageError> {
        self.collection
            .find_one(filter)
            .await
            .map_err(|e| StorageError::backend(BACKEND, "find_one", e))
    }

    /// Documents are sorted by `_id` so that pages are stable between calls.
    async fn find(
        &self,
        filter: Document,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Document>, StorageError> {
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { ID_FIELD: 1 })
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await
            .map_err(|e| StorageError::backend(BACKEND, "find", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| StorageError::backend(BACKEND, "cursor", e))
    }

    async fn count_documents(&self, filter: Document) -> Result<u64, StorageError> {
        self.collection
            .count_documents(filter)
            .await
            .map_err(|e| StorageError::backend(BACKEND, "count", e))
    }

    async fn update_one(
        &self,
        filter: Document,
        set: Document,
    ) -> Result<UpdateOutcome, StorageError> {
        let result = self
            .collection
            .update_one(filter, doc! { "$set": set })
            .await
            .map_err(|e| StorageError::backend(BACKEND, "update", e))?;

        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, StorageError> {
        let result = self
            .collection
            .delete_one(filter)
            .await
            .map_err(|e| StorageError::backend(BACKEND, "delete", e))?;

        Ok(result.deleted_count)
    }
}
