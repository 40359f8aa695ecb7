//! Core types: the listing model, identifier and document normalization,
//! filter construction, the store abstraction and the property service

pub mod document;
pub mod error;
pub mod id;
pub mod property;
pub mod query;
pub mod service;
pub mod store;

pub use error::{ApiError, StorageError, ValidationError};
pub use id::PropertyId;
pub use property::{
    Address, GeoLocation, PaginatedPropertyResponse, PaginationInfo, Property, PropertyPatch,
};
pub use query::{PageRequest, PropertyQuery, SearchParams};
pub use service::PropertyService;
pub use store::{PropertyStore, UpdateOutcome};
