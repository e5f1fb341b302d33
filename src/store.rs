//! Object Store Clients
//!
//! Builds the `object_store` client a retrieval runs against. Clients are
//! request-scoped: each call to [`StoreProvider::store_for`] returns a fresh
//! client built from read-only configuration plus any credentials supplied
//! with the request.

use std::fmt;
use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::ObjectStore;
use thiserror::Error;

use crate::config::{StoreBackend, StoreConfig};

/// Errors raised while constructing a store client
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to build {backend} store client: {source}")]
    Build {
        backend: &'static str,
        #[source]
        source: object_store::Error,
    },
}

/// Result type alias for store construction
pub type StoreResult<T> = Result<T, StoreError>;

/// Static access keys supplied alongside a request
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

// Keep secrets out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .finish()
    }
}

/// Source of object store clients
pub trait StoreProvider: Send + Sync {
    /// Build a client, applying request credentials when present
    fn store_for(&self, credentials: Option<&Credentials>) -> StoreResult<Arc<dyn ObjectStore>>;

    /// Short label for health output and logs
    fn describe(&self) -> String;
}

/// Provider driven by the `[store]` config section
#[derive(Debug, Clone)]
pub struct ConfiguredStoreProvider {
    config: StoreConfig,
}

impl ConfiguredStoreProvider {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    fn s3(&self, credentials: Option<&Credentials>) -> StoreResult<Arc<dyn ObjectStore>> {
        // Ambient AWS_* variables first, explicit settings on top
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(&self.config.bucket)
            .with_region(&self.config.region)
            .with_allow_http(self.config.allow_http);

        if let Some(endpoint) = &self.config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        let keys = match credentials {
            Some(c) => Some((c.access_key_id.as_str(), c.secret_access_key.as_str())),
            None => self
                .config
                .access_key_id
                .as_deref()
                .zip(self.config.secret_access_key.as_deref()),
        };
        if let Some((key_id, secret)) = keys {
            builder = builder
                .with_access_key_id(key_id)
                .with_secret_access_key(secret);
        }

        let store = builder.build().map_err(|source| StoreError::Build {
            backend: "s3",
            source,
        })?;
        Ok(Arc::new(store))
    }

    fn local(&self) -> StoreResult<Arc<dyn ObjectStore>> {
        let store = LocalFileSystem::new_with_prefix(&self.config.local_root).map_err(|source| {
            StoreError::Build {
                backend: "local",
                source,
            }
        })?;
        Ok(Arc::new(store))
    }
}

impl StoreProvider for ConfiguredStoreProvider {
    fn store_for(&self, credentials: Option<&Credentials>) -> StoreResult<Arc<dyn ObjectStore>> {
        match self.config.backend {
            StoreBackend::S3 => self.s3(credentials),
            StoreBackend::Local => {
                if credentials.is_some() {
                    tracing::debug!("Ignoring request credentials for local store");
                }
                self.local()
            }
        }
    }

    fn describe(&self) -> String {
        match self.config.backend {
            StoreBackend::S3 => format!("s3://{} ({})", self.config.bucket, self.config.region),
            StoreBackend::Local => format!("file://{}", self.config.local_root),
        }
    }
}

/// Provider that always hands out the same client
pub struct StaticStoreProvider {
    store: Arc<dyn ObjectStore>,
}

impl StaticStoreProvider {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

impl StoreProvider for StaticStoreProvider {
    fn store_for(&self, _credentials: Option<&Credentials>) -> StoreResult<Arc<dyn ObjectStore>> {
        Ok(Arc::clone(&self.store))
    }

    fn describe(&self) -> String {
        self.store.to_string()
    }
}
