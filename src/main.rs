use anyhow::Result;
use listings::config::AppConfig;
use listings::server::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        backend = ?config.database.backend,
        address = %config.server.address(),
        "Starting listings API"
    );

    let store = listings::storage::connect(&config.database).await?;

    ServerBuilder::new(config).with_store(store).serve().await
}
