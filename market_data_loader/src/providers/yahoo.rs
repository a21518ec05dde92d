//! Yahoo Finance chart API (`/v8/finance/chart/{symbol}`), daily interval.

pub mod params;
pub mod provider;
pub mod response;

pub use params::YahooConfig;
pub use provider::YahooProvider;
