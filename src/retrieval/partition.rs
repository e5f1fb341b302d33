//! Partition key construction
//!
//! Objects are laid out Hive-style:
//!
//! ```text
//! processed/timeframe=15m/exchange=NSE/symbol=NSE_CIPLA-EQ/year=2024/month=03/day=09/part-0000.parquet
//! ```
//!
//! Some historical writers percent-encoded the `=` separators, so every day
//! has to be probed under both [`KeyEncoding`] variants.

use chrono::{Datelike, NaiveDate};

/// Default root segment of the partition tree
pub const DEFAULT_PREFIX_ROOT: &str = "processed";

/// Suffix appended to equity symbols
const EQUITY_SUFFIX: &str = "-EQ";

/// How `key=value` separators were written for a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEncoding {
    /// `timeframe=15m`
    Plain,
    /// `timeframe%3D15m`
    PercentEncoded,
}

impl KeyEncoding {
    /// Probe order. Both are always tried, plain first.
    pub const ALL: [KeyEncoding; 2] = [KeyEncoding::Plain, KeyEncoding::PercentEncoded];

    /// Separator placed between a partition column and its value
    pub fn separator(&self) -> String {
        match self {
            KeyEncoding::Plain => "=".to_string(),
            KeyEncoding::PercentEncoded => urlencoding::encode("=").into_owned(),
        }
    }
}

impl std::fmt::Display for KeyEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyEncoding::Plain => write!(f, "plain"),
            KeyEncoding::PercentEncoded => write!(f, "percent-encoded"),
        }
    }
}

/// Normalize a symbol to its partition form, e.g. `cipla` -> `NSE_CIPLA-EQ`.
///
/// Idempotent: normalizing an already normalized symbol returns it unchanged.
pub fn normalize_symbol(symbol: &str, exchange: &str) -> String {
    let mut s = symbol.trim().to_uppercase();
    let prefix = format!("{}_", exchange.trim().to_uppercase());

    if !s.ends_with(EQUITY_SUFFIX) {
        s.push_str(EQUITY_SUFFIX);
    }
    if !s.starts_with(&prefix) {
        s.insert_str(0, &prefix);
    }
    s
}

/// A candidate prefix for one day under one encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPrefix {
    pub day: NaiveDate,
    pub encoding: KeyEncoding,
    pub prefix: String,
}

/// Builds partition prefixes for a single (timeframe, exchange, symbol)
#[derive(Debug, Clone)]
pub struct PartitionKeyBuilder {
    root: String,
    timeframe: String,
    exchange: String,
    symbol: String,
}

impl PartitionKeyBuilder {
    /// `symbol` is normalized against `exchange` on construction
    pub fn new(timeframe: &str, exchange: &str, symbol: &str) -> Self {
        Self {
            root: DEFAULT_PREFIX_ROOT.to_string(),
            timeframe: timeframe.trim().to_string(),
            exchange: exchange.trim().to_string(),
            symbol: normalize_symbol(symbol, exchange),
        }
    }

    /// Builder method: override the root segment
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into().trim_matches('/').to_string();
        self
    }

    /// The normalized symbol used in keys
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Render the prefix for one day under one encoding
    pub fn prefix(&self, day: NaiveDate, encoding: KeyEncoding) -> String {
        let eq = encoding.separator();
        format!(
            "{root}/timeframe{eq}{tf}/exchange{eq}{ex}/symbol{eq}{sym}/year{eq}{y}/month{eq}{m:02}/day{eq}{d:02}/",
            root = self.root,
            tf = self.timeframe,
            ex = self.exchange,
            sym = self.symbol,
            y = day.year(),
            m = day.month(),
            d = day.day(),
        )
    }

    /// Both candidate prefixes for a day, in probe order
    pub fn prefixes_for_day(&self, day: NaiveDate) -> [PartitionPrefix; 2] {
        KeyEncoding::ALL.map(|encoding| PartitionPrefix {
            day,
            encoding,
            prefix: self.prefix(day, encoding),
        })
    }
}
