//! # Pricevault
//!
//! Read-side service for OHLCV price data stored as date-partitioned
//! Parquet files in an object store.
//!
//! ## Features
//!
//! - **Relative ranges**: `1d`, `7d`, `3m`, `1y` resolved against the current time
//! - **Partition probing**: plain and percent-encoded Hive-style key layouts
//! - **File budget**: a hard cap on decoded objects per query
//! - **Schema drift**: objects with differing columns merge into one table
//!
//! ## Modules
//!
//! - [`retrieval`]: Range resolution, listing, fetching and assembly
//! - [`store`]: Object store client construction
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pricevault::config::Config;
//! use pricevault::retrieval::{PriceQuery, RetrievalOrchestrator};
//! use pricevault::store::{ConfiguredStoreProvider, StoreProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let store = ConfiguredStoreProvider::new(config.store.clone()).store_for(None)?;
//!
//!     let query = PriceQuery::parse("CIPLA,15m,7d", "NSE", 50)?;
//!     let result = RetrievalOrchestrator::new(store)
//!         .run(&query, chrono::Utc::now())
//!         .await?;
//!
//!     println!("Found {} rows in {} files", result.rows_returned(), result.files_read);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod retrieval;
pub mod store;

// Re-export top-level types for convenience
pub use retrieval::{
    AssembledResult, PriceQuery, RetrievalError, RetrievalOrchestrator, RetrievalResult, Table,
};

pub use store::{
    ConfiguredStoreProvider, Credentials, StaticStoreProvider, StoreError, StoreProvider,
    StoreResult,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{
    ApiConfig, Config, ConfigError, LoggingConfig, RetrievalConfig, StoreBackend, StoreConfig,
};
