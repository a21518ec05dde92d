//! Per-bar derived columns.

use market_data_loader::models::bar::{PriceBar, PriceSeries};
use serde::Serialize;
use tracing::debug;

use crate::{MA_LONG_WINDOW, MA_SHORT_WINDOW, returns::pct_change, sma::simple_moving_average};

/// A [`PriceBar`] with its derived indicator values.
///
/// Each derived field is `None` until the series has enough history to define it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnrichedBar {
    #[serde(flatten)]
    pub bar: PriceBar,

    /// Mean close of the trailing 20 bars, this one included.
    pub ma20: Option<f64>,

    /// Mean close of the trailing 50 bars, this one included.
    pub ma50: Option<f64>,

    /// Simple return versus the previous bar's close.
    pub daily_return: Option<f64>,
}

/// A [`PriceSeries`] extended row by row with derived values.
///
/// Has exactly one row per input bar, in the same order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSeries {
    symbol: String,
    rows: Vec<EnrichedBar>,
}

impl EnrichedSeries {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn rows(&self) -> &[EnrichedBar] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The last `n` rows (all of them if there are fewer).
    pub fn tail(&self, n: usize) -> &[EnrichedBar] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    /// Drops the derived columns, giving back the original series.
    pub fn to_price_series(&self) -> PriceSeries {
        // Rows are already ascending and unique, so this only copies.
        PriceSeries::from_unordered(
            self.symbol.clone(),
            self.rows.iter().map(|row| row.bar).collect(),
        )
    }
}

/// Computes `ma20`, `ma50` and `daily_return` for every bar of `series`.
///
/// Never reorders, drops, or adds rows. An empty series yields an empty result.
pub fn enrich(series: &PriceSeries) -> EnrichedSeries {
    let closes = series.closes();
    let ma20 = simple_moving_average(&closes, MA_SHORT_WINDOW);
    let ma50 = simple_moving_average(&closes, MA_LONG_WINDOW);
    let daily_returns = pct_change(&closes);

    let rows: Vec<EnrichedBar> = series
        .bars()
        .iter()
        .zip(ma20)
        .zip(ma50)
        .zip(daily_returns)
        .map(|(((bar, ma20), ma50), daily_return)| EnrichedBar {
            bar: *bar,
            ma20,
            ma50,
            daily_return,
        })
        .collect();

    debug!(symbol = series.symbol(), rows = rows.len(), "enriched series");

    EnrichedSeries {
        symbol: series.symbol().to_string(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close - 1.0,
                high: close + 2.0,
                low: close - 2.0,
                close,
                volume: 100 * i as u64,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn single_bar_has_nothing_defined() {
        let enriched = enrich(&series(&[50.0]));

        assert_eq!(enriched.len(), 1);
        let row = enriched.rows()[0];
        assert_eq!(row.bar.close, 50.0);
        assert_eq!((row.ma20, row.ma50, row.daily_return), (None, None, None));
    }

    #[test]
    fn twentieth_bar_gets_first_ma20() {
        let closes: Vec<f64> = (1..=20).map(f64::from).collect();
        let enriched = enrich(&series(&closes));

        assert_eq!(enriched.rows()[18].ma20, None);
        assert_eq!(enriched.rows()[19].ma20, Some(10.5));
        assert!(enriched.rows().iter().all(|r| r.ma50.is_none()));
    }

    #[test]
    fn derived_values_ignore_ohlv_columns() {
        let base = series(&[10.0, 11.0, 12.0]);
        let mut bars = base.bars().to_vec();
        for bar in &mut bars {
            bar.open *= 3.0;
            bar.high += 100.0;
            bar.volume = 0;
        }
        let other = PriceSeries::new("TEST", bars).unwrap();

        let a: Vec<_> = enrich(&base).rows().iter().map(|r| (r.ma20, r.ma50, r.daily_return)).collect();
        let b: Vec<_> = enrich(&other).rows().iter().map(|r| (r.ma20, r.ma50, r.daily_return)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn tail_is_clamped() {
        let enriched = enrich(&series(&[1.0, 2.0, 3.0]));
        assert_eq!(enriched.tail(2).len(), 2);
        assert_eq!(enriched.tail(2)[0].bar.close, 2.0);
        assert_eq!(enriched.tail(50).len(), 3);
        assert!(enriched.tail(0).is_empty());
    }

    #[test]
    fn serializes_undefined_as_null() {
        let enriched = enrich(&series(&[10.0, 12.0]));
        let json = serde_json::to_value(enriched.rows()).unwrap();

        assert_eq!(json[0]["ma20"], serde_json::Value::Null);
        assert_eq!(json[0]["daily_return"], serde_json::Value::Null);
        assert_eq!(json[1]["daily_return"], serde_json::json!(0.2));
        assert_eq!(json[1]["close"], serde_json::json!(12.0));
        assert_eq!(json[1]["date"], serde_json::json!("2023-01-02"));
    }
}
