//! Pricevault API Server
//!
//! Run with: cargo run --bin pricevault-api
//!
//! # Configuration
//!
//! - `PRICEVAULT_CONFIG`: Path to a config file (default: standard locations)
//! - `S3_BUCKET`, `AWS_REGION`, `AWS_ENDPOINT_URL`: Store settings
//! - `PRICEVAULT_API_HOST` / `PRICEVAULT_API_PORT`: Bind address (default: 0.0.0.0:8082)
//! - `RUST_LOG`: Log filter, overrides `logging.level`

use pricevault::api::{serve, AppState};
use pricevault::config::Config;
use pricevault::store::ConfiguredStoreProvider;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::var("PRICEVAULT_CONFIG") {
        Ok(path) => Config::load_with_env(&PathBuf::from(path))?,
        Err(_) => Config::load_default(),
    };

    // Initialize tracing
    config.logging.init_tracing();

    tracing::info!("Starting Pricevault API server v{}", env!("CARGO_PKG_VERSION"));

    let provider = Arc::new(ConfiguredStoreProvider::new(config.store.clone()));
    tracing::info!(
        backend = ?config.store.backend,
        bucket = %config.store.bucket,
        region = %config.store.region,
        "Object store configured"
    );

    let api_config = config.api.clone();
    let state = AppState::new(provider, config);

    serve(state, &api_config).await?;

    tracing::info!("Pricevault API server stopped");
    Ok(())
}
