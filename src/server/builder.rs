//! ServerBuilder for fluent API to build the HTTP server

use super::handlers::AppState;
use super::router::build_router;
use crate::config::AppConfig;
use crate::core::service::PropertyService;
use crate::core::store::PropertyStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder wiring a [`PropertyStore`] and the configuration into a router
///
/// # Example
///
/// ```ignore
/// let config = AppConfig::load()?;
/// let store = listings::storage::connect(&config.database).await?;
///
/// ServerBuilder::new(config)
///     .with_store(store)
///     .serve()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    store: Option<Arc<dyn PropertyStore>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the property store (required)
    pub fn with_store(mut self, store: Arc<dyn PropertyStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Add routes outside the properties API (health checks, admin, ...)
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the property service from the configured store
    pub fn build_service(&self) -> Result<PropertyService> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow::anyhow!("PropertyStore is required. Call .with_store()"))?;

        let pagination = &self.config.pagination;
        Ok(PropertyService::new(store)
            .with_page_sizes(pagination.default_page_size, pagination.max_page_size))
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let service = self.build_service()?;
        let mut router = build_router(AppState::new(service), &self.config.server.cors_origins);
        for routes in self.custom_routes {
            router = router.merge(routes);
        }
        Ok(router)
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the configured address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.address();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}


/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
