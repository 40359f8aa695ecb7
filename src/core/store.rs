//! Document store abstraction
//!
//! The service only needs a handful of single-collection operations. They are
//! expressed in terms of raw BSON documents and filter expressions so that the
//! same normalization code runs on top of every backend.

use crate::core::error::StorageError;
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

/// Counts reported by a partial-merge update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents matching the filter
    pub matched_count: u64,
    /// Documents whose content actually changed
    pub modified_count: u64,
}

/// A single collection of listing documents
///
/// Filters use MongoDB query syntax: `{ field: value }` for equality and
/// `{ field: { "$gte": v } }` / `{ field: { "$lte": v } }` for ranges.
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Insert a document and return the identifier assigned to it
    ///
    /// Returns `Bson::Null` if the backend did not report one.
    async fn insert_one(&self, document: Document) -> Result<Bson, StorageError>;

    /// First document matching the filter
    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StorageError>;

    /// Up to `limit` documents matching the filter after skipping `skip`,
    /// ordered by `_id` ascending (string ids sort before ObjectIds)
    async fn find(
        &self,
        filter: Document,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Document>, StorageError>;

    /// Number of documents matching the filter
    async fn count_documents(&self, filter: Document) -> Result<u64, StorageError>;

    /// Apply `$set` to the first document matching the filter
    async fn update_one(
        &self,
        filter: Document,
        set: Document,
    ) -> Result<UpdateOutcome, StorageError>;

    /// Delete at most one document and return how many were removed
    async fn delete_one(&self, filter: Document) -> Result<u64, StorageError>;
}
