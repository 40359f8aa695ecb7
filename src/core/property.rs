//! Property listing model and response envelopes

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One listing, as exposed by the API
///
/// Stored documents are normalized by [`crate::core::document::normalize_document`]
/// before being decoded into this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Property {
    /// Stringified store identifier. Never client-assigned.
    #[serde(default, alias = "_id")]
    pub id: Option<String>,

    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub property_type: Option<String>,

    #[serde(default)]
    pub bedrooms: Option<i32>,

    #[serde(default)]
    pub bathrooms: Option<f64>,

    /// Always a string: either a decimal (`"120.00"`) or a currency string (`"$120.00"`)
    #[serde(default)]
    pub price: Option<String>,

    #[serde(default)]
    pub address: Option<Address>,

    #[serde(default)]
    pub amenities: Option<Vec<String>>,

    /// Promoted from `images.picture_url`
    #[serde(default)]
    pub picture_url: Option<String>,

    /// Promoted from `review_scores.review_scores_rating`
    #[serde(default)]
    pub review_scores_rating: Option<f64>,
}

impl Property {
    /// Create a property with only a name set
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            summary: None,
            property_type: None,
            bedrooms: None,
            bathrooms: None,
            price: None,
            address: None,
            amenities: None,
            picture_url: None,
            review_scores_rating: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub government_area: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub location: Option<GeoLocation>,
}

/// GeoJSON point as stored in the listings dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub coordinates: Vec<f64>,
    #[serde(default)]
    pub is_location_exact: Option<bool>,
}

/// Partial update body
///
/// Only the fields present in the request are written (`$set` semantics).
/// Unknown keys, including `id`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PropertyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_scores_rating: Option<f64>,
}

impl PropertyPatch {
    /// Whether the patch carries no field at all
    pub fn is_empty(&self) -> bool {
        *self == PropertyPatch::default()
    }
}

/// Pagination metadata attached to every list/search response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// Current page (starts at 1)
    pub page: u64,
    pub page_size: u64,
    /// Total matches for the filter, independent of the page
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PaginationInfo {
    /// Derive pagination metadata
    ///
    /// `page` and `page_size` are expected to be at least 1; the paginator
    /// rejects anything smaller before getting here.
    pub fn new(page: u64, page_size: u64, total_count: u64) -> Self {
        let page_size = page_size.max(1);

        Self {
            page,
            page_size,
            total_count,
            total_pages: total_count.div_ceil(page_size),
            has_next: page.saturating_mul(page_size) < total_count,
            has_previous: page > 1,
        }
    }
}

/// A page of properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedPropertyResponse {
    pub pagination: PaginationInfo,
    pub properties: Vec<Property>,
}
