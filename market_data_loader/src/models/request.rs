use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a [`BarsRequest`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("ticker symbol cannot be empty")]
    EmptySymbol,
}

/// Vendor-agnostic parameters for a daily-bars download.
///
/// `start` is inclusive and `end` is exclusive, the same convention the
/// vendor's download endpoint uses. A request with `end <= start` covers no
/// trading day at all; see [`BarsRequest::is_empty_range`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarsRequest {
    /// Upper-cased ticker symbol (e.g. `"AAPL"`, `"VOLV-B.ST"`).
    pub symbol: String,

    /// First calendar day to include.
    pub start: NaiveDate,

    /// First calendar day to exclude.
    pub end: NaiveDate,
}

impl BarsRequest {
    /// Builds a request, normalizing the symbol (trimmed, upper-case).
    pub fn new(symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Self, RequestError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(RequestError::EmptySymbol);
        }
        Ok(Self { symbol, start, end })
    }

    /// `true` when the range cannot contain any bar (`end <= start`).
    pub fn is_empty_range(&self) -> bool {
        self.end <= self.start
    }
}
