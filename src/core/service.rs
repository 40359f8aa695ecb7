//! Property operations on top of a [`PropertyStore`]

use crate::core::document::{ID_FIELD, decode_property, encode_patch, encode_property};
use crate::core::error::{ApiError, ValidationError};
use crate::core::id::{PropertyId, stringify_id};
use crate::core::property::{PaginatedPropertyResponse, PaginationInfo, Property, PropertyPatch};
use crate::core::query::{DEFAULT_PAGE, PropertyQuery};
use crate::core::store::PropertyStore;
use mongodb::bson::{Bson, Document, doc};
use std::sync::Arc;
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// CRUD, listing and search over the properties collection
///
/// Cheap to clone; all clones share the same store.
#[derive(Clone)]
pub struct PropertyService {
    store: Arc<dyn PropertyStore>,
    default_page_size: u64,
    max_page_size: u64,
}

impl PropertyService {
    pub fn new(store: Arc<dyn PropertyStore>) -> Self {
        Self {
            store,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    /// Override the page size limits
    pub fn with_page_sizes(mut self, default_page_size: u64, max_page_size: u64) -> Self {
        self.default_page_size = default_page_size;
        self.max_page_size = max_page_size;
        self
    }

    pub fn store(&self) -> &Arc<dyn PropertyStore> {
        &self.store
    }

    /// Run a filtered, paginated search
    ///
    /// Missing pagination parameters fall back to page 1 and the configured
    /// default page size. An `id` filter short-circuits to a single-document
    /// lookup.
    pub async fn search(
        &self,
        query: &PropertyQuery,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<PaginatedPropertyResponse, ApiError> {
        let request = query.plan(
            page.unwrap_or(DEFAULT_PAGE),
            page_size.unwrap_or(self.default_page_size),
        );
        tracing::debug!(
            filter = %request.filter,
            page = request.page,
            page_size = request.page_size,
            "Searching properties"
        );
        self.paginate(request.filter, request.page, request.page_size)
            .await
    }

    /// Count and fetch one page of documents matching `filter`
    pub async fn paginate(
        &self,
        filter: Document,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedPropertyResponse, ApiError> {
        if page < 1 {
            return Err(ValidationError::field("page", "must be at least 1").into());
        }
        if page_size < 1 {
            return Err(ValidationError::field("page_size", "must be at least 1").into());
        }
        if page_size > self.max_page_size {
            return Err(ValidationError::field(
                "page_size",
                format!("must not exceed {}", self.max_page_size),
            )
            .into());
        }
        let skip = (page - 1)
            .checked_mul(page_size)
            .ok_or_else(|| ValidationError::field("page", "is too large"))?;

        let total_count = self.store.count_documents(filter.clone()).await?;
        let documents = self.store.find(filter, skip, page_size).await?;

        let properties = documents
            .into_iter()
            .map(decode_property)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedPropertyResponse {
            pagination: PaginationInfo::new(page, page_size, total_count),
            properties,
        })
    }

    /// Insert a new property and return it as stored
    ///
    /// Any client-supplied `id` is discarded; the store assigns one.
    pub async fn create(&self, property: Property) -> Result<Property, ApiError> {
        property.validate()?;

        let document = encode_property(&property)?;
        let inserted_id = self.store.insert_one(document).await?;
        if matches!(inserted_id, Bson::Null) {
            return Err(ApiError::CreateFailed);
        }

        let stored = self
            .store
            .find_one(doc! { ID_FIELD: inserted_id.clone() })
            .await?
            .ok_or(ApiError::CreateFailed)?;

        tracing::info!(id = %stringify_id(&inserted_id), "Created property");
        Ok(decode_property(stored)?)
    }

    pub async fn get(&self, id: &str) -> Result<Property, ApiError> {
        let property_id = PropertyId::parse(id);
        let document = self
            .store
            .find_one(doc! { ID_FIELD: property_id })
            .await?
            .ok_or_else(|| ApiError::NotFound { id: id.to_string() })?;

        Ok(decode_property(document)?)
    }

    /// Merge the supplied fields into an existing property
    ///
    /// Fails with [`ApiError::NotFound`] when nothing matches the identifier and
    /// with [`ApiError::Unchanged`] when the document already had these values.
    pub async fn update(&self, id: &str, patch: PropertyPatch) -> Result<Property, ApiError> {
        if patch.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        patch.validate()?;

        let property_id = PropertyId::parse(id);
        let set = encode_patch(&patch)?;
        let outcome = self
            .store
            .update_one(doc! { ID_FIELD: property_id.clone() }, set)
            .await?;

        if outcome.matched_count == 0 {
            return Err(ApiError::NotFound { id: id.to_string() });
        }
        if outcome.modified_count == 0 {
            return Err(ApiError::Unchanged { id: id.to_string() });
        }

        tracing::info!(id = %property_id, "Updated property");
        let document = self
            .store
            .find_one(doc! { ID_FIELD: property_id })
            .await?
            .ok_or_else(|| ApiError::NotFound { id: id.to_string() })?;

        Ok(decode_property(document)?)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        let property_id = PropertyId::parse(id);
        let deleted = self
            .store
            .delete_one(doc! { ID_FIELD: property_id.clone() })
            .await?;

        if deleted == 0 {
            return Err(ApiError::NotFound { id: id.to_string() });
        }

        tracing::info!(id = %property_id, "Deleted property");
        Ok(true)
    }
}
