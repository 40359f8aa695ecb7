//! # Listings API
//!
//! HTTP service exposing CRUD and search endpoints over an Airbnb-style
//! property listings collection stored in MongoDB.
//!
//! ## Features
//!
//! - **Filtered search**: type, name, minimum bedrooms, maximum price and
//!   bathroom filters, or a direct lookup by identifier
//! - **Pagination**: page/page_size with total counts and navigation flags
//! - **Document normalization**: Decimal128 prices and bathrooms, nested
//!   picture URLs and ratings are flattened into one typed model
//! - **Pluggable storage**: MongoDB for production, an in-memory store for
//!   development and tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listings::prelude::*;
//!
//! let config = AppConfig::load()?;
//! let store = listings::storage::connect(&config.database).await?;
//!
//! ServerBuilder::new(config).with_store(store).serve().await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::config::{AppConfig, StoreBackend};
    pub use crate::core::{
        ApiError, PaginatedPropertyResponse, PaginationInfo, Property, PropertyId, PropertyPatch,
        PropertyQuery, PropertyService, PropertyStore, SearchParams, StorageError,
        ValidationError,
    };
    pub use crate::server::{AppState, ServerBuilder};
    pub use crate::storage::{InMemoryPropertyStore, MongoPropertyStore};
}
