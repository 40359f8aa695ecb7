//! Storage implementations for different backends

pub mod in_memory;
pub mod mongodb;

pub use self::mongodb::MongoPropertyStore;
pub use in_memory::InMemoryPropertyStore;

use crate::config::{DatabaseConfig, StoreBackend};
use crate::core::error::StorageError;
use crate::core::store::PropertyStore;
use std::sync::Arc;

/// Open the store selected by the configuration
///
/// MongoDB connections are verified with a `ping` before being handed out.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn PropertyStore>, StorageError> {
    match config.backend {
        StoreBackend::Mongodb => {
            let store =
                MongoPropertyStore::connect(&config.url, &config.name, &config.collection).await?;
            store.ping().await?;
            tracing::info!(
                database = %config.name,
                collection = %config.collection,
                "Connected to MongoDB"
            );
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            Ok(Arc::new(InMemoryPropertyStore::new()))
        }
    }
}
