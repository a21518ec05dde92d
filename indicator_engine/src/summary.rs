//! Headline figures for a whole series.

use chrono::NaiveDate;
use market_data_loader::models::bar::PriceSeries;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    returns::pct_change,
    stats::{annualize_volatility_pct, sample_std_dev},
};

/// Why [`summarize`] could not produce metrics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotAvailable {
    /// Fewer than two bars: there is no previous close to compare with.
    #[error("summary metrics need at least 2 bars, got {bars}")]
    InsufficientBars { bars: usize },

    /// The second-to-last close is zero, so the daily change is undefined.
    #[error("close on {date} is zero; daily change is undefined")]
    DegenerateClose { date: NaiveDate },
}

/// Four summary figures for a series of at least two bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// Close of the last bar.
    pub latest_close: f64,

    /// Last close versus the one before it, in percent.
    pub daily_change_pct: f64,

    /// Sample standard deviation of daily returns × √252, in percent.
    ///
    /// `None` when only one daily return exists (a two-bar series).
    pub annualized_volatility_pct: Option<f64>,

    /// Number of bars in the series.
    pub trading_day_count: usize,
}

/// Reduces `series` to [`SummaryMetrics`].
pub fn summarize(series: &PriceSeries) -> Result<SummaryMetrics, NotAvailable> {
    let bars = series.bars();
    let [.., previous, latest] = bars else {
        return Err(NotAvailable::InsufficientBars { bars: bars.len() });
    };

    if previous.close == 0.0 {
        return Err(NotAvailable::DegenerateClose {
            date: previous.date,
        });
    }

    let daily_change_pct = (latest.close - previous.close) / previous.close * 100.0;

    let daily_returns: Vec<f64> = pct_change(&series.closes()).into_iter().flatten().collect();
    let annualized_volatility_pct = sample_std_dev(&daily_returns).map(annualize_volatility_pct);

    debug!(
        symbol = series.symbol(),
        returns = daily_returns.len(),
        "summarized series"
    );

    Ok(SummaryMetrics {
        latest_close: latest.close,
        daily_change_pct,
        annualized_volatility_pct,
        trading_day_count: bars.len(),
    })
}
