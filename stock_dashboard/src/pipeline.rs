//! One dashboard run: load bars, enrich them, summarize them.
//!
//! The run halts on the first of two conditions, with nothing partial handed
//! to presentation:
//! - [`PipelineError::NoData`]: the loader returned no bars (unknown ticker,
//!   network failure, empty or inverted range);
//! - [`PipelineError::MetricsUnavailable`]: the series is too short for the
//!   summary figures.

use chrono::NaiveDate;
use indicator_engine::{EnrichedBar, EnrichedSeries, NotAvailable, SummaryMetrics, enrich, summarize};
use market_data_loader::{
    CachedLoader,
    models::request::{BarsRequest, RequestError},
    providers::DataProvider,
};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Parameters collected from the user for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardParams {
    pub ticker: String,
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
    pub show_ma20: bool,
    pub show_ma50: bool,
}

impl DashboardParams {
    pub fn bars_request(&self) -> Result<BarsRequest, RequestError> {
        BarsRequest::new(&self.ticker, self.start, self.end)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid ticker: {0}")]
    InvalidTicker(#[from] RequestError),

    #[error("No data found for {ticker}. Check the ticker.")]
    NoData { ticker: String },

    #[error("Metrics not available: {0}")]
    MetricsUnavailable(#[from] NotAvailable),
}

/// Everything presentation needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// The run's parameters, with the ticker normalized as it was requested.
    pub params: DashboardParams,
    pub metrics: SummaryMetrics,
    pub enriched: EnrichedSeries,
}

impl DashboardView {
    /// Trailing rows for the table preview.
    pub fn preview(&self, rows: usize) -> &[EnrichedBar] {
        self.enriched.tail(rows)
    }
}

/// Runs the fetch → enrich → summarize sequence for `params`.
pub async fn run<P: DataProvider>(
    loader: &CachedLoader<P>,
    params: &DashboardParams,
) -> Result<DashboardView, PipelineError> {
    let request = params.bars_request()?;
    let series = loader.load(&request).await;

    if series.is_empty() {
        return Err(PipelineError::NoData {
            ticker: request.symbol,
        });
    }

    let enriched = enrich(&series);
    let metrics = summarize(&series)?;

    info!(
        ticker = %request.symbol,
        bars = series.len(),
        latest_close = metrics.latest_close,
        "dashboard ready"
    );

    Ok(DashboardView {
        params: DashboardParams {
            ticker: request.symbol,
            ..params.clone()
        },
        metrics,
        enriched,
    })
}
