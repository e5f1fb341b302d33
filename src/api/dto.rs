//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::retrieval::Row;
use crate::store::Credentials;

// ============================================
// PRICE DTOs
// ============================================

/// Query parameters for `GET /price/get/:params`
#[derive(Debug, Default, Deserialize)]
pub struct PriceParams {
    /// Exchange code, defaults to the configured exchange
    #[serde(default)]
    pub exchange: Option<String>,
    /// File budget, defaults to the configured budget
    #[serde(default)]
    pub max_files: Option<usize>,
    #[serde(default)]
    pub aws_access_key: Option<String>,
    #[serde(default)]
    pub aws_secret_key: Option<String>,
}

/// Range query response
#[derive(Debug, Serialize)]
pub struct PriceResponse {
    /// Symbol as requested
    pub symbol: String,
    /// Symbol as it appears in partition keys
    pub symbol_partition: String,
    pub timeframe: String,
    pub range: String,
    pub rows_returned: usize,
    /// Objects successfully decoded
    pub files_read: usize,
    pub data: Vec<Row>,
}

// ============================================
// KEY DTOs
// ============================================

/// Query parameters for `GET /price/get_by_key`
#[derive(Debug, Deserialize)]
pub struct KeyParams {
    /// Full object key inside the bucket
    pub key: String,
    #[serde(default)]
    pub aws_access_key: Option<String>,
    #[serde(default)]
    pub aws_secret_key: Option<String>,
}

/// Direct key fetch response
#[derive(Debug, Serialize)]
pub struct KeyResponse {
    pub key: String,
    pub rows: usize,
    pub data: Vec<Row>,
}

/// Pair up optional request keys.
///
/// A missing half is filled from the configured static keys. With no request
/// keys at all the store's own credential chain applies. A half that cannot
/// be filled is a client error.
pub fn request_credentials(
    access_key: Option<&str>,
    secret_key: Option<&str>,
    store: &StoreConfig,
) -> Result<Option<Credentials>, String> {
    if access_key.is_none() && secret_key.is_none() {
        return Ok(None);
    }

    let key = access_key.or(store.access_key_id.as_deref());
    let secret = secret_key.or(store.secret_access_key.as_deref());
    match (key, secret) {
        (Some(key), Some(secret)) => Ok(Some(Credentials::new(key, secret))),
        (None, _) => Err("aws_access_key is required when aws_secret_key is supplied".to_string()),
        (_, None) => Err("aws_secret_key is required when aws_access_key is supplied".to_string()),
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,
    /// Store backend description
    pub store: String,
    pub bucket: String,
    pub region: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
