//! Canonical in-memory representation of daily price bars (OHLCV).
//!
//! These types are the standard output of every
//! [`DataProvider`](crate::providers::DataProvider) and the standard input of the
//! indicator engine, regardless of which vendor produced the rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One trading day's record.
///
/// No relationship between `open`, `high`, `low` and `close` is enforced here;
/// vendors occasionally publish bars where e.g. `close > high` after adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading day in the exchange's local calendar.
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price of the session.
    pub high: f64,

    /// Lowest price of the session.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Shares traded during the session.
    pub volume: u64,
}

/// Errors raised when bars cannot form a [`PriceSeries`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    /// Dates are not strictly increasing (out of order or duplicated).
    #[error("bars must be strictly increasing by date: {previous} is followed by {next}")]
    Unordered { previous: NaiveDate, next: NaiveDate },
}

/// An ordered run of daily bars for a single symbol.
///
/// Bars are ascending by date with no duplicate dates. The empty series is a
/// valid value: it is how the loader reports "nothing found".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, rejecting bars that are not strictly increasing by date.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        if let Some(pair) = bars.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(SeriesError::Unordered {
                previous: pair[0].date,
                next: pair[1].date,
            });
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Builds a series from rows in arbitrary order.
    ///
    /// Rows are sorted by date; when several rows share a date the last one
    /// received wins (vendors append an intraday row for the current session
    /// after the settled one).
    pub fn from_unordered(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);

        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: deduped,
        }
    }

    /// A series with no bars.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The close column, in series order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn into_bars(self) -> Vec<PriceBar> {
        self.bars
    }
}
