//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::store::StoreProvider;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Builds a store client per request
    pub store_provider: Arc<dyn StoreProvider>,
    /// Service configuration
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store_provider: Arc<dyn StoreProvider>, config: Config) -> Self {
        Self {
            store_provider,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Deadline applied to one retrieval
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.api.request_timeout_secs)
    }
}
