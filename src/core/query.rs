//! Search parameters and filter construction
//!
//! [`SearchParams`] is extracted from the URL query string; [`PropertyQuery`]
//! holds the filter part of it and turns it into a MongoDB filter document
//! plus the page to fetch.
//!
//! ```text
//! GET /search?property_type=Apartment&min_bedrooms=2&page=2&page_size=20
//! GET /search?id=507f1f77bcf86cd799439011        // single-document lookup
//! ```

use crate::core::document::{
    BATHROOMS_FIELD, BEDROOMS_FIELD, ID_FIELD, NAME_FIELD, PRICE_FIELD, PROPERTY_TYPE_FIELD,
};
use crate::core::id::PropertyId;
use mongodb::bson::{Document, doc};
use serde::Deserialize;

/// Page used when the caller does not supply one
pub const DEFAULT_PAGE: u64 = 1;

/// Query string of the list and search endpoints
///
/// All fields are optional; pagination defaults are applied by the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub property_type: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub min_bedrooms: Option<i64>,
    pub max_price: Option<f64>,
    pub bathrooms: Option<f64>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl SearchParams {
    /// Filter part of the parameters
    pub fn query(&self) -> PropertyQuery {
        PropertyQuery {
            property_type: self.property_type.clone(),
            name: self.name.clone(),
            id: self.id.clone(),
            min_bedrooms: self.min_bedrooms,
            max_price: self.max_price,
            bathrooms: self.bathrooms,
        }
    }
}

/// Optional filters over the properties collection
///
/// Present filters are ANDed together. An `id` filter dominates everything
/// else, see [`PropertyQuery::plan`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyQuery {
    pub property_type: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub min_bedrooms: Option<i64>,
    pub max_price: Option<f64>,
    pub bathrooms: Option<f64>,
}

/// A filter plus the page of results to fetch for it
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub filter: Document,
    pub page: u64,
    pub page_size: u64,
}

impl PropertyQuery {
    /// Drop the identifier filter
    ///
    /// Used by the list endpoint, which never does single-document lookups.
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    /// Build the filter document
    ///
    /// With an `id`, the filter is exactly `{ "_id": <normalized id> }` and every
    /// other field is ignored.
    pub fn filter(&self) -> Document {
        if let Some(id) = &self.id {
            return doc! { ID_FIELD: PropertyId::parse(id) };
        }

        let mut filter = Document::new();

        if let Some(property_type) = non_empty(&self.property_type) {
            filter.insert(PROPERTY_TYPE_FIELD, property_type);
        }
        if let Some(name) = non_empty(&self.name) {
            filter.insert(NAME_FIELD, name);
        }
        if let Some(min_bedrooms) = self.min_bedrooms {
            filter.insert(BEDROOMS_FIELD, doc! { "$gte": min_bedrooms });
        }
        if let Some(max_price) = self.max_price {
            // Compared lexically against currency strings such as "$120.00";
            // not numerically correct across digit counts.
            filter.insert(PRICE_FIELD, doc! { "$lte": format_price(max_price) });
        }
        if let Some(bathrooms) = self.bathrooms {
            filter.insert(BATHROOMS_FIELD, bathrooms);
        }

        filter
    }

    /// Build the filter and decide which page to fetch
    ///
    /// An `id` filter forces `page = 1, page_size = 1` regardless of what the
    /// caller asked for.
    pub fn plan(&self, page: u64, page_size: u64) -> PageRequest {
        let filter = self.filter();
        if self.id.is_some() {
            return PageRequest {
                filter,
                page: 1,
                page_size: 1,
            };
        }

        PageRequest {
            filter,
            page,
            page_size,
        }
    }
}

/// Currency representation used by the listings dataset
pub fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
