//! Partitioned Retrieval Engine
//!
//! Resolves a `symbol,timeframe,range` query into day partitions in the
//! object store, fetches and decodes every matching Parquet object within a
//! file budget, and returns one merged, time-filtered table.
//!
//! - **range**: Relative range tokens (`7d`, `3m`, `1y`) and day enumeration
//! - **partition**: Symbol normalization and partition prefixes
//! - **budget**: Shared file-read budget
//! - **lister**: Lazy, paginated prefix listing
//! - **fetcher**: Object fetch + Parquet decode with local recovery
//! - **table**: Tagged-row tables
//! - **assemble**: Outer-union merge and range filter
//! - **orchestrator**: Day × encoding × listing traversal
//! - **query**: Combined query token parsing
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Range path:
//!   Query → Days → Prefixes (plain, %3D) → List → Fetch/Decode → Merge → Filter
//!
//! Key path:
//!   Key → Fetch/Decode → Normalize timestamp column
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use pricevault::retrieval::{PriceQuery, RetrievalOrchestrator};
//! use object_store::memory::InMemory;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemory::new());
//!     let query = PriceQuery::parse("CIPLA,15m,7d", "NSE", 50)?;
//!
//!     let result = RetrievalOrchestrator::new(store)
//!         .run(&query, chrono::Utc::now())
//!         .await?;
//!
//!     println!("{} rows from {} files", result.rows_returned(), result.files_read);
//!     Ok(())
//! }
//! ```

pub mod assemble;
pub mod budget;
pub mod error;
pub mod fetcher;
pub mod lister;
pub mod orchestrator;
pub mod partition;
pub mod query;
pub mod range;
pub mod table;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export commonly used types
pub use assemble::{
    concat_tables, find_timestamp_column, normalize_naive, parse_timestamp, AssembledResult,
    ResultAssembler, TIMESTAMP_CANDIDATES,
};
pub use budget::ReadBudget;
pub use error::{RetrievalError, RetrievalResult};
pub use fetcher::{FetchOutcome, ObjectFetcher};
pub use lister::{Listing, ObjectLister, PARQUET_EXTENSION};
pub use orchestrator::RetrievalOrchestrator;
pub use partition::{normalize_symbol, KeyEncoding, PartitionKeyBuilder, PartitionPrefix};
pub use query::{PriceQuery, DEFAULT_EXCHANGE, DEFAULT_MAX_FILES};
pub use range::{RangeSpec, RangeUnit, ResolvedRange};
pub use table::{decode_parquet, Row, Table};
