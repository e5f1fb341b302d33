//! Retrieval orchestration
//!
//! Drives the day × key-encoding × listing loop for one range query:
//!
//! ```text
//! Idle → ListingDay(day, encoding) → Fetching(key) → ... → Done | Failed
//! ```
//!
//! Traversal is sequential: each fetch completes before the next listing
//! step. The file budget is global to the query; once it is spent every
//! loop stops immediately.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use object_store::ObjectStore;

use crate::retrieval::assemble::{AssembledResult, ResultAssembler};
use crate::retrieval::budget::ReadBudget;
use crate::retrieval::error::RetrievalResult;
use crate::retrieval::fetcher::{FetchOutcome, ObjectFetcher};
use crate::retrieval::lister::{Listing, ObjectLister};
use crate::retrieval::partition::{PartitionKeyBuilder, PartitionPrefix, DEFAULT_PREFIX_ROOT};
use crate::retrieval::query::PriceQuery;
use crate::retrieval::range::ResolvedRange;
use crate::retrieval::table::Table;

/// Tables gathered so far
#[derive(Debug, Default)]
struct Collected {
    tables: Vec<Table>,
    skipped: usize,
}

pub struct RetrievalOrchestrator {
    store: Arc<dyn ObjectStore>,
    fetcher: ObjectFetcher,
    prefix_root: String,
}

impl RetrievalOrchestrator {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            fetcher: ObjectFetcher::new(Arc::clone(&store)),
            store,
            prefix_root: DEFAULT_PREFIX_ROOT.to_string(),
        }
    }

    /// Builder method: root segment of the partition tree
    pub fn prefix_root(mut self, root: impl Into<String>) -> Self {
        self.prefix_root = root.into();
        self
    }

    /// Run a range query anchored at `now`
    pub async fn run(&self, query: &PriceQuery, now: DateTime<Utc>) -> RetrievalResult<AssembledResult> {
        let range = ResolvedRange::resolve(&query.range, now)?;
        let keys = PartitionKeyBuilder::new(&query.timeframe, &query.exchange, &query.symbol)
            .root(self.prefix_root.as_str());
        let budget = ReadBudget::new(query.max_files);

        tracing::info!(
            symbol = %keys.symbol(),
            timeframe = %query.timeframe,
            range = %query.range,
            days = range.day_count(),
            max_files = query.max_files,
            "Resolving range query"
        );

        let mut collected = Collected::default();
        for day in range.days() {
            if budget.is_exhausted() {
                break;
            }
            for prefix in keys.prefixes_for_day(day) {
                if budget.is_exhausted() {
                    break;
                }
                self.drain_prefix(&prefix, &budget, &mut collected).await?;
            }
        }
        if budget.is_exhausted() {
            tracing::debug!(max_files = budget.limit(), "File budget exhausted");
        }

        let files_read = budget.used();
        let files_skipped = collected.skipped;
        let (table, timestamp_column) = ResultAssembler::new(range).assemble(collected.tables)?;

        tracing::info!(
            files_read,
            files_skipped,
            rows = table.len(),
            "Range query assembled"
        );

        Ok(AssembledResult {
            table,
            timestamp_column: timestamp_column.map(str::to_string),
            files_read,
            files_skipped,
        })
    }

    /// List and fetch parquet objects under one prefix until the listing
    /// ends or the budget is spent
    async fn drain_prefix(
        &self,
        prefix: &PartitionPrefix,
        budget: &ReadBudget,
        collected: &mut Collected,
    ) -> RetrievalResult<()> {
        tracing::debug!(day = %prefix.day, encoding = %prefix.encoding, prefix = %prefix.prefix, "Probing partition");

        let mut lister = ObjectLister::new(self.store.as_ref(), &prefix.prefix, budget)?;
        loop {
            let key = match lister.next().await? {
                Listing::Key(key) => key,
                Listing::End | Listing::BudgetExhausted => return Ok(()),
            };

            if !budget.try_reserve() {
                return Ok(());
            }
            match self.fetcher.fetch(&key).await {
                Ok(FetchOutcome::Decoded(table)) => collected.tables.push(table),
                Ok(FetchOutcome::Skipped { .. }) => {
                    budget.release();
                    collected.skipped += 1;
                }
                Err(e) => {
                    budget.release();
                    return Err(e);
                }
            }
        }
    }
}
