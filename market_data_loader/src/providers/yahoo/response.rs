use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::debug;

use crate::models::bar::{PriceBar, PriceSeries};

#[derive(Deserialize, Debug)]
pub struct ChartEnvelope {
    pub chart: Chart,
}

#[derive(Deserialize, Debug)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    pub meta: ChartMeta,
    // Absent when the range holds no sessions.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub exchange_timezone_name: Option<String>,
    pub gmtoffset: Option<i32>,
}

#[derive(Deserialize, Debug)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

/// Calendar the exchange trades in; daily timestamps are session opens in local time.
#[derive(Debug, Clone, Copy)]
enum ExchangeZone {
    Named(Tz),
    Fixed(FixedOffset),
    Utc,
}

impl ExchangeZone {
    fn from_meta(meta: &ChartMeta) -> Self {
        if let Some(tz) = meta
            .exchange_timezone_name
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
        {
            return Self::Named(tz);
        }

        match meta.gmtoffset.and_then(FixedOffset::east_opt) {
            Some(offset) => Self::Fixed(offset),
            None => Self::Utc,
        }
    }

    fn local_date(&self, epoch_seconds: i64) -> Option<NaiveDate> {
        let utc = DateTime::<Utc>::from_timestamp(epoch_seconds, 0)?;
        Some(match self {
            Self::Named(tz) => utc.with_timezone(tz).date_naive(),
            Self::Fixed(offset) => utc.with_timezone(offset).date_naive(),
            Self::Utc => utc.date_naive(),
        })
    }
}

impl ChartResult {
    /// Converts the column-oriented payload into a normalized [`PriceSeries`].
    ///
    /// Rows missing any of the four prices are dropped; a missing volume is 0.
    pub fn into_price_series(self, symbol: &str, auto_adjust: bool) -> PriceSeries {
        let zone = ExchangeZone::from_meta(&self.meta);
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();
        let adjclose = self
            .indicators
            .adjclose
            .into_iter()
            .next()
            .unwrap_or_default()
            .adjclose;

        let column = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

        let mut dropped = 0usize;
        let mut bars = Vec::with_capacity(self.timestamp.len());
        for (i, &ts) in self.timestamp.iter().enumerate() {
            let row = (
                zone.local_date(ts),
                column(&quote.open, i),
                column(&quote.high, i),
                column(&quote.low, i),
                column(&quote.close, i),
            );
            let (Some(date), Some(open), Some(high), Some(low), Some(close)) = row else {
                dropped += 1;
                continue;
            };

            let factor = match column(&adjclose, i) {
                Some(adj) if auto_adjust && close != 0.0 => adj / close,
                _ => 1.0,
            };
            let volume = column(&quote.volume, i).unwrap_or(0.0).max(0.0).round() as u64;

            bars.push(PriceBar {
                date,
                open: open * factor,
                high: high * factor,
                low: low * factor,
                close: close * factor,
                volume,
            });
        }

        if dropped > 0 {
            debug!(symbol, dropped, "dropped incomplete chart rows");
        }

        PriceSeries::from_unordered(symbol, bars)
    }
}
