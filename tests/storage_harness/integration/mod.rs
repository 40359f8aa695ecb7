//! Integration test infrastructure for storage backends.
//!
//! Drives any `PropertyStore` through the real API router
//! (HTTP → handler → PropertyService → store → response).
//!
//! # Architecture
//!
//! ```text
//! axum_test::TestServer
//!     └─ Router (built by build_test_router)
//!         ├─ GET    /                  → root
//!         ├─ GET    /properties        → list_properties
//!         ├─ POST   /properties        → create_property
//!         ├─ GET    /search            → search_properties
//!         ├─ GET    /properties/{id}   → get_property
//!         ├─ PUT    /properties/{id}   → update_property
//!         └─ DELETE /properties/{id}   → delete_property
//! ```

#[macro_use]
pub mod rest_tests;

use axum::Router;
use listings::core::service::PropertyService;
use listings::core::store::PropertyStore;
use listings::server::{AppState, build_routes};
use serde_json::Value;
use std::sync::Arc;

/// Build the API router over the given store, without tracing or CORS layers
pub fn build_test_router(store: Arc<dyn PropertyStore>) -> Router {
    build_routes(AppState::new(PropertyService::new(store)))
}

/// Names of the properties in a paginated response body, in order
pub fn property_names(body: &Value) -> Vec<String> {
    body["properties"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
