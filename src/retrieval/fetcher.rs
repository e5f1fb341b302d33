//! Object fetch + decode
//!
//! On the listing path a file that fails to decode is skipped and logged;
//! the query carries on with the remaining files. On the direct-key path
//! there is nothing to fall back to, so both a missing key and a decode
//! failure surface to the caller.

use std::sync::Arc;

use object_store::path::Path;
use object_store::ObjectStore;

use crate::retrieval::error::{RetrievalError, RetrievalResult};
use crate::retrieval::table::{decode_parquet, Table};

/// Result of fetching one listed object
#[derive(Debug)]
pub enum FetchOutcome {
    Decoded(Table),
    /// Object could not be decoded and was left out of the result
    Skipped { key: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct ObjectFetcher {
    store: Arc<dyn ObjectStore>,
}

impl ObjectFetcher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Fetch a key produced by a listing. Store errors propagate; decode
    /// errors are recovered into [`FetchOutcome::Skipped`].
    pub async fn fetch(&self, key: &Path) -> RetrievalResult<FetchOutcome> {
        let data = self.store.get(key).await?.bytes().await?;
        let size = data.len();

        match decode_parquet(data) {
            Ok(table) => {
                tracing::debug!(key = %key, bytes = size, rows = table.len(), "Decoded object");
                Ok(FetchOutcome::Decoded(table))
            }
            Err(reason) => {
                tracing::warn!(key = %key, error = %reason, "Skipping undecodable object");
                Ok(FetchOutcome::Skipped {
                    key: key.to_string(),
                    reason,
                })
            }
        }
    }

    /// Fetch a single caller-supplied key
    pub async fn fetch_key(&self, key: &str) -> RetrievalResult<Table> {
        let path = Path::parse(key).map_err(|e| RetrievalError::InvalidKey {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let result = match self.store.get(&path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(RetrievalError::ObjectNotFound(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let data = result.bytes().await?;

        decode_parquet(data).map_err(|reason| RetrievalError::ObjectDecode {
            key: key.to_string(),
            reason,
        })
    }
}
