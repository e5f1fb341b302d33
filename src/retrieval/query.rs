//! Range query parameters
//!
//! A query arrives as one combined token, `symbol,timeframe,range`
//! (e.g. `CIPLA,15m,1d`), plus an exchange and a file budget.

use crate::retrieval::error::{RetrievalError, RetrievalResult};
use crate::retrieval::partition::normalize_symbol;
use crate::retrieval::range::RangeSpec;

pub const DEFAULT_EXCHANGE: &str = "NSE";
pub const DEFAULT_MAX_FILES: usize = 50;

/// A validated range query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuery {
    /// Symbol as supplied (trimmed)
    pub symbol: String,
    pub timeframe: String,
    /// Range token as supplied, e.g. `7d`
    pub range: String,
    pub exchange: String,
    pub max_files: usize,
}

impl PriceQuery {
    /// Parse the combined `symbol,timeframe,range` token.
    ///
    /// The range token is validated here so malformed ranges are rejected
    /// before any store access.
    pub fn parse(params: &str, exchange: &str, max_files: usize) -> RetrievalResult<Self> {
        let parts: Vec<&str> = params.split(',').map(str::trim).collect();
        let [symbol, timeframe, range] = parts.as_slice() else {
            return Err(RetrievalError::MalformedQuery(params.to_string()));
        };

        if max_files == 0 {
            return Err(RetrievalError::InvalidBudget);
        }
        RangeSpec::parse(range)?;

        Ok(Self {
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            range: range.to_string(),
            exchange: exchange.trim().to_string(),
            max_files,
        })
    }

    /// Builder method: set exchange
    pub fn exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = exchange.into();
        self
    }

    /// Normalized symbol as it appears in partition keys
    pub fn symbol_partition(&self) -> String {
        normalize_symbol(&self.symbol, &self.exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let q = PriceQuery::parse("CIPLA, 15m ,1d", DEFAULT_EXCHANGE, DEFAULT_MAX_FILES).unwrap();
        assert_eq!(q.symbol, "CIPLA");
        assert_eq!(q.timeframe, "15m");
        assert_eq!(q.range, "1d");
        assert_eq!(q.exchange, "NSE");
        assert_eq!(q.max_files, 50);
        assert_eq!(q.symbol_partition(), "NSE_CIPLA-EQ");
    }

    #[test]
    fn test_wrong_token_count() {
        for params in ["CIPLA,15m", "CIPLA", "CIPLA,15m,1d,extra", ""] {
            assert!(
                matches!(
                    PriceQuery::parse(params, "NSE", 10),
                    Err(RetrievalError::MalformedQuery(_))
                ),
                "params {:?}",
                params
            );
        }
    }

    #[test]
    fn test_range_validated_up_front() {
        assert!(matches!(
            PriceQuery::parse("CIPLA,15m,abcd", "NSE", 10),
            Err(RetrievalError::MalformedRange(_))
        ));
        assert!(matches!(
            PriceQuery::parse("CIPLA,15m,5x", "NSE", 10),
            Err(RetrievalError::UnknownRangeUnit(_))
        ));
    }

    #[test]
    fn test_zero_budget_rejected() {
        assert!(matches!(
            PriceQuery::parse("CIPLA,15m,1d", "NSE", 0),
            Err(RetrievalError::InvalidBudget)
        ));
    }

    #[test]
    fn test_exchange_override() {
        let q = PriceQuery::parse("RELIANCE,1d,1y", "NSE", 5).unwrap().exchange("BSE");
        assert_eq!(q.symbol_partition(), "BSE_RELIANCE-EQ");
    }
}
