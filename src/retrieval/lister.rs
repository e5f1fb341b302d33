//! Prefix listing
//!
//! Wraps the store's paginated listing stream. Pages are requested lazily
//! as keys are consumed, so stopping on budget exhaustion also stops any
//! further page requests. Keys come back in store order.

use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use object_store::path::Path;
use object_store::{ObjectMeta, ObjectStore};

use crate::retrieval::budget::ReadBudget;
use crate::retrieval::error::{RetrievalError, RetrievalResult};

/// Extension of objects worth fetching (compared case-insensitively)
pub const PARQUET_EXTENSION: &str = ".parquet";

/// What the lister produced on a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// A matching key, ready to be fetched
    Key(Path),
    /// The shared budget is spent; callers must stop every loop
    BudgetExhausted,
    /// All pages for this prefix have been consumed
    End,
}

/// Lazily walks every object under one prefix
pub struct ObjectLister<'a> {
    prefix: String,
    stream: BoxStream<'static, object_store::Result<ObjectMeta>>,
    budget: &'a ReadBudget,
}

impl<'a> ObjectLister<'a> {
    /// Start listing `prefix`. No request is issued until the first
    /// [`next`](Self::next) call.
    pub fn new(store: &dyn ObjectStore, prefix: &str, budget: &'a ReadBudget) -> RetrievalResult<Self> {
        let path = Path::parse(prefix).map_err(|e| RetrievalError::InvalidKey {
            key: prefix.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            prefix: prefix.to_string(),
            stream: store.list(Some(&path)),
            budget,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Advance to the next `.parquet` key
    pub async fn next(&mut self) -> RetrievalResult<Listing> {
        loop {
            if self.budget.is_exhausted() {
                return Ok(Listing::BudgetExhausted);
            }

            match self.stream.next().await {
                None => return Ok(Listing::End),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(meta)) => {
                    if is_parquet_key(meta.location.as_ref()) {
                        return Ok(Listing::Key(meta.location));
                    }
                    tracing::trace!(key = %meta.location, "Skipping non-parquet object");
                }
            }
        }
    }
}

/// Case-insensitive `.parquet` suffix check
pub fn is_parquet_key(key: &str) -> bool {
    key.to_ascii_lowercase().ends_with(PARQUET_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::test_util::{memory_store, put_raw};
    use bytes::Bytes;

    #[test]
    fn test_is_parquet_key() {
        assert!(is_parquet_key("a/b/part-0.parquet"));
        assert!(is_parquet_key("a/b/PART-0.PARQUET"));
        assert!(!is_parquet_key("a/b/_SUCCESS"));
        assert!(!is_parquet_key("a/b/part-0.parquet.crc"));
    }

    #[tokio::test]
    async fn test_lists_only_parquet_under_prefix() {
        let store = memory_store();
        put_raw(&store, "p/day=01/a.parquet", Bytes::from_static(b"x")).await;
        put_raw(&store, "p/day=01/_SUCCESS", Bytes::from_static(b"x")).await;
        put_raw(&store, "p/day=01/b.PARQUET", Bytes::from_static(b"x")).await;
        put_raw(&store, "p/day=02/c.parquet", Bytes::from_static(b"x")).await;

        let budget = ReadBudget::new(10);
        let mut lister = ObjectLister::new(store.as_ref(), "p/day=01/", &budget).unwrap();

        let mut keys = Vec::new();
        loop {
            match lister.next().await.unwrap() {
                Listing::Key(k) => keys.push(k.to_string()),
                Listing::End => break,
                Listing::BudgetExhausted => panic!("budget should not run out"),
            }
        }
        keys.sort();
        assert_eq!(keys, vec!["p/day=01/a.parquet", "p/day=01/b.PARQUET"]);
    }

    #[tokio::test]
    async fn test_stops_when_budget_exhausted() {
        let store = memory_store();
        put_raw(&store, "p/a.parquet", Bytes::from_static(b"x")).await;
        put_raw(&store, "p/b.parquet", Bytes::from_static(b"x")).await;

        let budget = ReadBudget::new(1);
        let mut lister = ObjectLister::new(store.as_ref(), "p/", &budget).unwrap();

        assert!(matches!(lister.next().await.unwrap(), Listing::Key(_)));
        assert!(budget.try_reserve());
        assert_eq!(lister.next().await.unwrap(), Listing::BudgetExhausted);
    }

    #[tokio::test]
    async fn test_percent_encoded_prefix_is_literal() {
        let store = memory_store();
        put_raw(&store, "p/day%3D01/a.parquet", Bytes::from_static(b"x")).await;

        let budget = ReadBudget::new(5);
        let mut plain = ObjectLister::new(store.as_ref(), "p/day=01/", &budget).unwrap();
        assert_eq!(plain.next().await.unwrap(), Listing::End);

        let mut encoded = ObjectLister::new(store.as_ref(), "p/day%3D01/", &budget).unwrap();
        match encoded.next().await.unwrap() {
            Listing::Key(k) => assert_eq!(k.as_ref(), "p/day%3D01/a.parquet"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_prefix() {
        let store = memory_store();
        let budget = ReadBudget::new(1);
        assert!(matches!(
            ObjectLister::new(store.as_ref(), "p//day=01/", &budget),
            Err(RetrievalError::InvalidKey { .. })
        ));
    }
}
