//! Configuration loading and management
//!
//! Settings are resolved in three layers: built-in defaults, an optional YAML
//! file (path in `LISTINGS_CONFIG`), then individual environment variables.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8000
//!   cors_origins: ["http://localhost:3000"]
//! database:
//!   backend: mongodb
//!   url: mongodb://localhost:27017
//!   name: sample_airbnb
//!   collection: listingsAndReviews
//! pagination:
//!   default_page_size: 10
//!   max_page_size: 100
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Environment variable holding the path of the YAML configuration file
pub const CONFIG_PATH_ENV: &str = "LISTINGS_CONFIG";

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS (the frontend)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl ServerConfig {
    /// `host:port` to bind to
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which [`crate::core::store::PropertyStore`] to run on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongodb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::Mongodb),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown store backend '{}'", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: String,
    pub name: String,
    pub collection: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Mongodb,
            url: "mongodb://localhost:27017".to_string(),
            name: "sample_airbnb".to_string(),
            collection: "listingsAndReviews".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: crate::core::service::DEFAULT_PAGE_SIZE,
            max_page_size: crate::core::service::MAX_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("failed to parse '{}'", path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration from the process environment
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment-style overrides
    ///
    /// Recognised keys: `MONGO_URL`, `DB_NAME`, `COLLECTION_NAME`, `HOST`,
    /// `PORT`, `STORE_BACKEND`, `CORS_ORIGINS` (comma separated).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("MONGO_URL") {
            self.database.url = url;
        }
        if let Some(name) = lookup("DB_NAME") {
            self.database.name = name;
        }
        if let Some(collection) = lookup("COLLECTION_NAME") {
            self.database.collection = collection;
        }
        if let Some(backend) = lookup("STORE_BACKEND") {
            self.database.backend = backend.parse()?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("invalid PORT '{}'", port))?;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        let pagination = &self.pagination;
        if pagination.default_page_size == 0 || pagination.max_page_size == 0 {
            bail!("page sizes must be at least 1");
        }
        if pagination.default_page_size > pagination.max_page_size {
            bail!(
                "default_page_size ({}) exceeds max_page_size ({})",
                pagination.default_page_size,
                pagination.max_page_size
            );
        }
        Ok(())
    }
}
