//! Relative range resolution
//!
//! Turns tokens like `7d`, `3m` or `1y` into an absolute `[start, end]`
//! window ending at `now`, and enumerates the calendar days that window
//! touches. Months are 30 days and years 365 days regardless of the
//! calendar.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::retrieval::error::{RetrievalError, RetrievalResult};

/// Unit suffix of a range token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeUnit {
    /// `d`
    Day,
    /// `m`, 30 days
    Month,
    /// `y`, 365 days
    Year,
}

impl RangeUnit {
    /// Parse a unit character, case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'd' => Some(RangeUnit::Day),
            'm' => Some(RangeUnit::Month),
            'y' => Some(RangeUnit::Year),
            _ => None,
        }
    }

    pub fn days_per_unit(&self) -> u64 {
        match self {
            RangeUnit::Day => 1,
            RangeUnit::Month => 30,
            RangeUnit::Year => 365,
        }
    }
}

/// A parsed but not yet anchored range token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub magnitude: u64,
    pub unit: RangeUnit,
}

impl RangeSpec {
    /// Parse a token such as `15d`.
    ///
    /// The magnitude is validated before the unit, so `abcd` reports
    /// [`RetrievalError::MalformedRange`] and `5x` reports
    /// [`RetrievalError::UnknownRangeUnit`].
    pub fn parse(token: &str) -> RetrievalResult<Self> {
        let token = token.trim();
        let unit_char = token
            .chars()
            .last()
            .ok_or_else(|| RetrievalError::MalformedRange(token.to_string()))?;
        let digits = &token[..token.len() - unit_char.len_utf8()];

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RetrievalError::MalformedRange(token.to_string()));
        }
        let magnitude: u64 = digits
            .parse()
            .map_err(|_| RetrievalError::MalformedRange(token.to_string()))?;

        let unit = RangeUnit::from_char(unit_char)
            .ok_or_else(|| RetrievalError::UnknownRangeUnit(unit_char.to_string()))?;

        Ok(Self { magnitude, unit })
    }

    /// Total number of days covered
    pub fn total_days(&self) -> Option<u64> {
        self.magnitude.checked_mul(self.unit.days_per_unit())
    }
}

/// Absolute window a query is filtered to (inclusive on both ends)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ResolvedRange {
    /// Resolve a range token relative to `now`
    pub fn resolve(token: &str, now: DateTime<Utc>) -> RetrievalResult<Self> {
        let spec = RangeSpec::parse(token)?;
        Self::from_spec(&spec, now).ok_or_else(|| RetrievalError::MalformedRange(token.trim().to_string()))
    }

    /// Anchor a parsed range at `now`; `None` if the start falls outside the
    /// representable calendar
    pub fn from_spec(spec: &RangeSpec, now: DateTime<Utc>) -> Option<Self> {
        let days = i64::try_from(spec.total_days()?).ok()?;
        let start = now.checked_sub_signed(Duration::try_days(days)?)?;
        Some(Self { start, end: now })
    }

    /// Check whether an instant falls inside the window
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.start && *ts <= self.end
    }

    /// Every calendar day from `start.date()` to `end.date()`, both included.
    ///
    /// This is a superset of what [`contains`](Self::contains) admits so that
    /// partition probing never misses a boundary day.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.start.date_naive();
        let last = self.end.date_naive();
        first.iter_days().take_while(move |d| *d <= last)
    }

    /// Number of days yielded by [`days`](Self::days)
    pub fn day_count(&self) -> usize {
        (self.end.date_naive() - self.start.date_naive()).num_days() as usize + 1
    }
}
