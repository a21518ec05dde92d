use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, StatusCode, header};
use snafu::{ResultExt, ensure};
use tracing::{debug, info};

use crate::{
    models::{bar::PriceSeries, request::BarsRequest},
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, DecodeSnafu, EmptyBaseUrlSnafu,
        InvalidUserAgentSnafu, ProviderError, ProviderInitError, ReqwestSnafu, ValidationSnafu,
        yahoo::{
            params::{YahooConfig, construct_params, validate_symbol},
            response::ChartEnvelope,
        },
    },
};

pub struct YahooProvider {
    client: Client,
    config: YahooConfig,
    limiter: DefaultDirectRateLimiter,
}

impl YahooProvider {
    /// Creates a provider with [`YahooConfig::default`].
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_config(YahooConfig::default())
    }

    pub fn with_config(config: YahooConfig) -> Result<Self, ProviderInitError> {
        ensure!(!config.base_url.trim().is_empty(), EmptyBaseUrlSnafu);

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent).context(InvalidUserAgentSnafu)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .context(ClientBuildSnafu)?;

        let limiter = RateLimiter::direct(Quota::per_second(config.requests_per_second));

        Ok(Self {
            client,
            config,
            limiter,
        })
    }
}

#[async_trait]
impl DataProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_daily_bars(&self, request: &BarsRequest) -> Result<PriceSeries, ProviderError> {
        if let Err(message) = validate_symbol(&request.symbol) {
            return ValidationSnafu { message }.fail();
        }

        self.limiter.until_ready().await;

        let url = self.config.chart_url(&request.symbol);
        info!(symbol = %request.symbol, start = %request.start, end = %request.end, "requesting daily chart");

        let response = self
            .client
            .get(&url)
            .query(&construct_params(request))
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;

        let series = decode_chart_body(status, &body, &request.symbol, self.config.auto_adjust)?;
        debug!(symbol = %request.symbol, bars = series.len(), "decoded daily chart");
        Ok(series)
    }
}

/// Maps a chart response onto a series or a [`ProviderError`].
///
/// A non-success status and a `chart.error` payload are both [`ProviderError::Api`];
/// a body that is not chart JSON is [`ProviderError::Decode`].
pub(crate) fn decode_chart_body(
    status: StatusCode,
    body: &str,
    symbol: &str,
    auto_adjust: bool,
) -> Result<PriceSeries, ProviderError> {
    if !status.is_success() {
        // Error bodies usually still carry a `chart.error` description.
        let message = serde_json::from_str::<ChartEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.chart.error)
            .map(|error| format!("{status}: {} ({})", error.description, error.code))
            .unwrap_or_else(|| format!("{status}: {}", body.trim()));
        return ApiSnafu { message }.fail();
    }

    let envelope: ChartEnvelope = serde_json::from_str(body).context(DecodeSnafu)?;

    if let Some(error) = envelope.chart.error {
        return ApiSnafu {
            message: format!("{} ({})", error.description, error.code),
        }
        .fail();
    }

    Ok(match envelope.chart.result.and_then(|results| results.into_iter().next()) {
        Some(result) => result.into_price_series(symbol, auto_adjust),
        None => PriceSeries::empty(symbol),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_base_url_is_rejected() {
        let config = YahooConfig {
            base_url: "  ".into(),
            ..Default::default()
        };
        let err = YahooProvider::with_config(config).err().unwrap();
        assert!(matches!(err, ProviderInitError::EmptyBaseUrl { .. }));
    }

    #[test]
    fn control_characters_in_user_agent_are_rejected() {
        let config = YahooConfig {
            user_agent: "bad\nagent".into(),
            ..Default::default()
        };
        let err = YahooProvider::with_config(config).err().unwrap();
        assert!(matches!(err, ProviderInitError::InvalidUserAgent { .. }));
    }

    #[tokio::test]
    async fn path_breaking_symbol_fails_before_any_request() {
        let provider = YahooProvider::with_config(YahooConfig {
            // Unroutable: the test must not reach the network.
            base_url: "http://127.0.0.1:9".into(),
            ..Default::default()
        })
        .unwrap();

        let request = BarsRequest::new(
            "AAPL/../MSFT",
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
        )
        .unwrap();

        let err = provider.fetch_daily_bars(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::Validation { .. }));
    }

    const DELISTED: &str = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

    #[test]
    fn error_status_uses_chart_error_description() {
        let err = decode_chart_body(StatusCode::NOT_FOUND, DELISTED, "ZZZZ", true).unwrap_err();
        assert!(matches!(err, ProviderError::Api { .. }));
        assert_eq!(
            err.to_string(),
            "API error: 404 Not Found: No data found, symbol may be delisted (Not Found)"
        );
    }

    #[test]
    fn error_status_without_json_keeps_raw_body() {
        let err =
            decode_chart_body(StatusCode::TOO_MANY_REQUESTS, " Too Many Requests\n", "AAPL", true)
                .unwrap_err();
        assert_eq!(err.to_string(), "API error: 429 Too Many Requests: Too Many Requests");
    }

    #[test]
    fn chart_error_on_success_status_is_api_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        let err = decode_chart_body(StatusCode::OK, body, "AAPL", true).unwrap_err();
        assert!(matches!(err, ProviderError::Api { .. }));
        assert_eq!(err.to_string(), "API error: Invalid input (Bad Request)");
    }

    #[test]
    fn non_json_body_is_decode_error() {
        let err = decode_chart_body(StatusCode::OK, "<html>oops</html>", "AAPL", true).unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[test]
    fn missing_result_is_empty_series() {
        let body = r#"{"chart":{"result":[],"error":null}}"#;
        let series = decode_chart_body(StatusCode::OK, body, "AAPL", true).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.symbol(), "AAPL");
    }
}
