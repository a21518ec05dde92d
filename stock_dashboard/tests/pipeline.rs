use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use indicator_engine::NotAvailable;
use market_data_loader::{
    CachedLoader,
    models::{
        bar::{PriceBar, PriceSeries},
        request::{BarsRequest, RequestError},
    },
    providers::{ApiSnafu, DataProvider, ProviderError},
};
use stock_dashboard::{
    pipeline::{self, DashboardParams, PipelineError},
    render::render_dashboard,
};

/// Serves the same closes for every request and counts how often it is asked.
struct ScriptedProvider {
    closes: Vec<f64>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(closes: Vec<f64>) -> Self {
        Self {
            closes,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_daily_bars(&self, request: &BarsRequest) -> Result<PriceSeries, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let bars = self
            .closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: request.start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 10_000,
            })
            .collect();
        Ok(PriceSeries::from_unordered(request.symbol.clone(), bars))
    }
}

struct DownProvider;

#[async_trait]
impl DataProvider for DownProvider {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn fetch_daily_bars(&self, _request: &BarsRequest) -> Result<PriceSeries, ProviderError> {
        ApiSnafu {
            message: "503 Service Unavailable",
        }
        .fail()
    }
}

fn params(ticker: &str) -> DashboardParams {
    DashboardParams {
        ticker: ticker.to_string(),
        start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        show_ma20: true,
        show_ma50: true,
    }
}

#[tokio::test]
async fn empty_series_is_no_data() {
    let loader = CachedLoader::new(ScriptedProvider::new(vec![]));

    let err = pipeline::run(&loader, &params("ZZZZ")).await.unwrap_err();
    assert!(matches!(&err, PipelineError::NoData { ticker } if ticker == "ZZZZ"));
    assert_eq!(err.to_string(), "No data found for ZZZZ. Check the ticker.");
}

#[tokio::test]
async fn provider_failure_is_no_data() {
    let loader = CachedLoader::new(DownProvider);

    let err = pipeline::run(&loader, &params("AAPL")).await.unwrap_err();
    assert!(matches!(err, PipelineError::NoData { .. }));
    assert!(loader.is_empty());
}

#[tokio::test]
async fn single_bar_stops_before_presentation() {
    let loader = CachedLoader::new(ScriptedProvider::new(vec![150.0]));

    let err = pipeline::run(&loader, &params("AAPL")).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::MetricsUnavailable(NotAvailable::InsufficientBars { bars: 1 })
    ));
}

#[tokio::test]
async fn constant_prices_produce_a_flat_dashboard() {
    let loader = CachedLoader::new(ScriptedProvider::new(vec![42.0; 60]));

    let view = pipeline::run(&loader, &params("aapl")).await.unwrap();

    assert_eq!(view.enriched.symbol(), "AAPL");
    assert_eq!(view.params.ticker, "AAPL");
    assert_eq!(view.metrics.trading_day_count, 60);
    assert_eq!(view.metrics.latest_close, 42.0);
    assert_eq!(view.metrics.daily_change_pct, 0.0);
    assert_eq!(view.metrics.annualized_volatility_pct, Some(0.0));

    let last = view.enriched.rows().last().unwrap();
    assert_eq!(last.ma20, Some(42.0));
    assert_eq!(last.ma50, Some(42.0));
    assert_eq!(last.daily_return, Some(0.0));

    let text = render_dashboard(&view, 5);
    assert!(text.contains("Last 5 of 60 trading days"));
    assert!(text.contains("$42.00"));
}

#[tokio::test]
async fn repeated_runs_reuse_the_cache() {
    let loader = CachedLoader::new(ScriptedProvider::new(vec![10.0, 11.0, 12.0]));

    let first = pipeline::run(&loader, &params("MSFT")).await.unwrap();
    let second = pipeline::run(&loader, &params("MSFT")).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(loader.provider().calls(), 1);

    let mut toggled = params("MSFT");
    toggled.show_ma50 = false;
    pipeline::run(&loader, &toggled).await.unwrap();
    assert_eq!(loader.provider().calls(), 1);

    let mut shifted = params("MSFT");
    shifted.start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    pipeline::run(&loader, &shifted).await.unwrap();
    assert_eq!(loader.provider().calls(), 2);
}

#[tokio::test]
async fn blank_ticker_is_rejected() {
    let loader = CachedLoader::new(ScriptedProvider::new(vec![1.0, 2.0]));

    let err = pipeline::run(&loader, &params("   ")).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::InvalidTicker(RequestError::EmptySymbol)
    ));
    assert_eq!(loader.provider().calls(), 0);
}

#[tokio::test]
async fn inverted_range_is_no_data_without_a_fetch() {
    let loader = CachedLoader::new(ScriptedProvider::new(vec![1.0, 2.0]));
    let mut inverted = params("AAPL");
    std::mem::swap(&mut inverted.start, &mut inverted.end);

    let err = pipeline::run(&loader, &inverted).await.unwrap_err();
    assert!(matches!(err, PipelineError::NoData { .. }));
    assert_eq!(loader.provider().calls(), 0);
}
