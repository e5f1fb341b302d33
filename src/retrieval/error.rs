//! Retrieval error types
//!
//! Defines all errors that can occur while resolving, listing, fetching
//! and assembling partitioned price data.

use thiserror::Error;

/// Errors that can occur in the retrieval engine
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Query token did not split into symbol, timeframe and range
    #[error("Malformed query '{0}': use symbol,timeframe,range (e.g. CIPLA,15m,1d)")]
    MalformedQuery(String),

    /// Range magnitude is not a non-negative integer
    #[error("Range malformed '{0}': use e.g. 1d, 7d, 3m, 1y")]
    MalformedRange(String),

    /// Range unit is not one of d, m, y
    #[error("Unknown range unit '{0}': use d/m/y")]
    UnknownRangeUnit(String),

    /// File budget must allow at least one read
    #[error("max_files must be greater than zero")]
    InvalidBudget,

    /// Object key cannot be represented as a store path
    #[error("Invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// Object bytes could not be decoded as a Parquet table
    #[error("Failed to decode {key}: {reason}")]
    ObjectDecode { key: String, reason: String },

    /// Requested object does not exist
    #[error("Key not found in bucket: {0}")]
    ObjectNotFound(String),

    /// No object under any probed partition could be decoded
    #[error("No parquet files found for query")]
    NoDataFound,

    /// Listing or fetch against the object store failed
    #[error("Object store error: {0}")]
    Store(#[from] object_store::Error),
}

/// Result type alias for retrieval operations
pub type RetrievalResult<T> = Result<T, RetrievalError>;
