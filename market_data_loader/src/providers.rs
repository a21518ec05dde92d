//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, the seam between the
//! memoizing [`CachedLoader`](crate::cache::CachedLoader) and whatever vendor
//! actually serves daily bars. The only vendor wired up is
//! [`yahoo::YahooProvider`]; tests plug in their own in-process providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_loader::models::{bar::PriceSeries, request::BarsRequest};
//! use market_data_loader::providers::{DataProvider, ProviderError};
//!
//! struct EmptyProvider;
//!
//! #[async_trait]
//! impl DataProvider for EmptyProvider {
//!     fn name(&self) -> &'static str {
//!         "empty"
//!     }
//!
//!     async fn fetch_daily_bars(
//!         &self,
//!         request: &BarsRequest,
//!     ) -> Result<PriceSeries, ProviderError> {
//!         Ok(PriceSeries::empty(request.symbol.clone()))
//!     }
//! }
//! ```

pub mod yahoo;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::PriceSeries, request::BarsRequest};

/// Trait for fetching daily bars from a market data provider.
///
/// Implementations return the bars already normalized into a [`PriceSeries`]
/// (ascending, one row per date). An unknown or delisted symbol may be
/// reported either as an empty series or as an error; the loader treats both
/// the same way.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Short identifier used in log events (e.g. `"yahoo"`).
    fn name(&self) -> &'static str;

    /// Fetches daily bars for `request.symbol` in `[request.start, request.end)`.
    async fn fetch_daily_bars(&self, request: &BarsRequest) -> Result<PriceSeries, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// User agent contains characters that are not valid in a header.
    #[snafu(display("Invalid user agent: {source}"))]
    InvalidUserAgent {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// Base URL is blank.
    #[snafu(display("Base URL cannot be empty"))]
    EmptyBaseUrl { backtrace: Backtrace },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned an error payload or a non-success status.
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The response body did not have the expected shape.
    #[snafu(display("Failed to decode provider response: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },
}
