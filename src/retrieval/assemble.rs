//! Result assembly
//!
//! Merges the decoded tables of a query into one table and filters it to
//! the resolved range:
//!
//! 1. Outer union: columns are the union of all inputs in first-seen order,
//!    rows keep table order then in-table order, missing cells become null.
//! 2. The first column present from [`TIMESTAMP_CANDIDATES`] is the time
//!    column. Without one, no filtering happens.
//! 3. Time cells are parsed leniently; unparsable cells become null and the
//!    row is dropped by the range filter.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::retrieval::error::{RetrievalError, RetrievalResult};
use crate::retrieval::range::ResolvedRange;
use crate::retrieval::table::{Row, Table};

/// Time column names, in priority order
pub const TIMESTAMP_CANDIDATES: [&str; 5] = ["timestamp", "ts", "time", "datetime", "date"];

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Assembled, filtered output of a range query
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledResult {
    pub table: Table,
    /// Column the range filter was applied to, if any
    pub timestamp_column: Option<String>,
    pub files_read: usize,
    pub files_skipped: usize,
}

impl AssembledResult {
    pub fn rows_returned(&self) -> usize {
        self.table.len()
    }
}

/// Concatenate tables with possibly different columns
pub fn concat_tables(tables: Vec<Table>) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for table in &tables {
        for col in &table.columns {
            if !columns.contains(col) {
                columns.push(col.clone());
            }
        }
    }

    let total: usize = tables.iter().map(Table::len).sum();
    let mut rows = Vec::with_capacity(total);
    for table in tables {
        for mut row in table.rows {
            let aligned: Row = columns
                .iter()
                .map(|col| (col.clone(), row.remove(col).unwrap_or(Value::Null)))
                .collect();
            rows.push(aligned);
        }
    }

    Table::new(columns, rows)
}

/// First timestamp-like column present, by priority
pub fn find_timestamp_column(columns: &[String]) -> Option<&'static str> {
    TIMESTAMP_CANDIDATES
        .iter()
        .copied()
        .find(|cand| columns.iter().any(|c| c == cand))
}

/// Parse a cell as a UTC instant.
///
/// Strings: RFC 3339, naive date-times (taken as UTC) and bare dates
/// (midnight UTC). Numbers: epoch nanoseconds. Anything else is `None`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => {
            let nanos = match n.as_i64() {
                Some(i) => i,
                None => {
                    let f = n.as_f64()?;
                    if !f.is_finite() || f.abs() >= i64::MAX as f64 {
                        return None;
                    }
                    f as i64
                }
            };
            Some(DateTime::from_timestamp_nanos(nanos))
        }
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Render as RFC 3339 in UTC, e.g. `2024-03-10T09:15:00Z`
pub fn format_utc(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Render as a naive UTC date-time without offset, e.g. `2024-03-10T09:15:00`
pub fn format_naive(ts: &DateTime<Utc>) -> String {
    ts.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Rewrite the timestamp column of a table as naive UTC strings, leaving
/// rows in place. Returns the column that was normalized, if any.
pub fn normalize_naive(table: &mut Table) -> Option<&'static str> {
    let column = find_timestamp_column(&table.columns)?;
    for row in &mut table.rows {
        if let Some(cell) = row.get_mut(column) {
            *cell = parse_timestamp(cell)
                .map(|ts| Value::String(format_naive(&ts)))
                .unwrap_or(Value::Null);
        }
    }
    Some(column)
}

/// Merges and filters the tables of one range query
#[derive(Debug, Clone, Copy)]
pub struct ResultAssembler {
    range: ResolvedRange,
}

impl ResultAssembler {
    pub fn new(range: ResolvedRange) -> Self {
        Self { range }
    }

    /// Assemble decoded tables. Fails with [`RetrievalError::NoDataFound`]
    /// when nothing was decoded.
    pub fn assemble(&self, tables: Vec<Table>) -> RetrievalResult<(Table, Option<&'static str>)> {
        if tables.is_empty() {
            return Err(RetrievalError::NoDataFound);
        }

        let mut merged = concat_tables(tables);
        let Some(column) = find_timestamp_column(&merged.columns) else {
            tracing::debug!("No timestamp column found, returning all rows unfiltered");
            return Ok((merged, None));
        };

        let before = merged.len();
        merged.rows = merged
            .rows
            .into_iter()
            .filter_map(|mut row| {
                let ts = row.get(column).and_then(parse_timestamp)?;
                if !self.range.contains(&ts) {
                    return None;
                }
                row.insert(column.to_string(), Value::String(format_utc(&ts)));
                Some(row)
            })
            .collect();

        tracing::debug!(
            column,
            rows_in = before,
            rows_out = merged.len(),
            "Applied range filter"
        );
        Ok((merged, Some(column)))
    }
}
