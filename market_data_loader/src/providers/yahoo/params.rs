use std::{num::NonZeroU32, time::Duration};

use chrono::{NaiveDate, NaiveTime};
use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};

use crate::models::request::BarsRequest;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

// The chart endpoint answers 429 to clients without a browser-like agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Connection and decoding settings for [`YahooProvider`](super::YahooProvider).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YahooConfig {
    /// Chart endpoint without the trailing symbol segment.
    pub base_url: String,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Whole-request timeout, in seconds.
    pub timeout_secs: u64,

    /// Client-side throttle on outgoing requests.
    pub requests_per_second: NonZeroU32,

    /// Scale open/high/low/close by `adjclose / close` (split and dividend adjusted prices).
    pub auto_adjust: bool,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            requests_per_second: nonzero!(2u32),
            auto_adjust: true,
        }
    }
}

impl YahooConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full chart URL for `symbol`.
    pub fn chart_url(&self, symbol: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), symbol)
    }
}

/// Midnight UTC of `date`, as Unix seconds.
pub(crate) fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::default()).and_utc().timestamp()
}

/// Query string for a daily chart request.
pub(crate) fn construct_params(request: &BarsRequest) -> Vec<(&'static str, String)> {
    vec![
        ("period1", epoch_seconds(request.start).to_string()),
        ("period2", epoch_seconds(request.end).to_string()),
        ("interval", "1d".to_string()),
        ("events", "div,splits".to_string()),
        ("includeAdjustedClose", "true".to_string()),
    ]
}

/// Rejects symbols that would change the URL path.
pub(crate) fn validate_symbol(symbol: &str) -> Result<(), String> {
    if symbol.contains(['/', '?', '#', ' ']) {
        return Err(format!("symbol {symbol:?} contains characters not allowed in a ticker"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_use_midnight_utc_epochs() {
        let request = BarsRequest::new(
            "AAPL",
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        )
        .unwrap();

        let params = construct_params(&request);
        assert!(params.contains(&("period1", "1704153600".to_string())));
        assert!(params.contains(&("period2", "1704240000".to_string())));
        assert!(params.contains(&("interval", "1d".to_string())));
    }

    #[test]
    fn chart_url_tolerates_trailing_slash() {
        let config = YahooConfig {
            base_url: "http://localhost:9000/chart/".into(),
            ..Default::default()
        };
        assert_eq!(config.chart_url("MSFT"), "http://localhost:9000/chart/MSFT");
    }

    #[test]
    fn path_breaking_symbols_are_rejected() {
        assert!(validate_symbol("BRK-B").is_ok());
        assert!(validate_symbol("^GSPC").is_ok());
        assert!(validate_symbol("AAPL/../x").is_err());
        assert!(validate_symbol("AA PL").is_err());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: YahooConfig = serde_json::from_str(r#"{"auto_adjust": false}"#).unwrap();
        assert!(!config.auto_adjust);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.requests_per_second.get(), 2);
    }
}
