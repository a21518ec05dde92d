//! Derived indicators for a daily price series.
//!
//! Everything here is a pure function of the close column:
//! - [`enrich`] adds the 20- and 50-bar simple moving averages and the daily
//!   simple return to every bar, leaving values undefined (`None`) until
//!   enough history exists;
//! - [`summarize`] reduces a series to four headline figures, or reports
//!   [`NotAvailable`] when the series is too short to support them.
//!
//! The numeric kernels ([`sma`], [`returns`], [`stats`]) work on plain `f64`
//! slices and are usable on their own.

use std::num::NonZeroUsize;

use nonzero_ext::nonzero;

pub mod enriched;
pub mod returns;
pub mod sma;
pub mod stats;
pub mod summary;

pub use enriched::{EnrichedBar, EnrichedSeries, enrich};
pub use summary::{NotAvailable, SummaryMetrics, summarize};

/// Window of the short moving average (`ma20`).
pub const MA_SHORT_WINDOW: NonZeroUsize = nonzero!(20usize);

/// Window of the long moving average (`ma50`).
pub const MA_LONG_WINDOW: NonZeroUsize = nonzero!(50usize);

/// Conventional number of trading sessions in a year, used to annualize volatility.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;
