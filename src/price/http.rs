//! HTTP price fetcher
//!
//! Queries a CoinGecko-style `simple/price` endpoint:
//! `GET {base_url}?ids={symbol}&vs_currencies={currency}` answering
//! `{"<symbol>": {"<currency>": <price>}}`.

use super::retry::RetryPolicy;
use super::traits::PriceSource;
use crate::error::{ConfigError, FetchError};
use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

/// Default public price endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Configuration for [`HttpPriceFetcher`]
#[derive(Debug, Clone)]
pub struct PriceFetcherConfig {
    /// Endpoint queried for every symbol
    pub base_url: String,
    /// Quote currency key in the response
    pub vs_currency: String,
    /// Timeout for a single attempt
    pub timeout: Duration,
    /// Retry budget and backoff
    pub retry: RetryPolicy,
}

impl Default for PriceFetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            vs_currency: "usd".to_string(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

/// Price source backed by a blocking HTTP client
pub struct HttpPriceFetcher {
    client: Client,
    config: PriceFetcherConfig,
}

impl HttpPriceFetcher {
    /// Build the HTTP client for the given configuration
    pub fn new(config: PriceFetcherConfig) -> Result<Self, ConfigError> {
        Url::parse(&config.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "price.base_url".to_string(),
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pricealert/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "price".to_string(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Get the fetcher configuration
    pub fn config(&self) -> &PriceFetcherConfig {
        &self.config
    }

    fn request_url(&self, symbol: &str) -> Result<Url, FetchError> {
        Url::parse_with_params(
            &self.config.base_url,
            &[("ids", symbol), ("vs_currencies", self.config.vs_currency.as_str())],
        )
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }

    fn fetch_once(&self, url: &Url, symbol: &str) -> Result<f64, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        parse_price_response(&body, symbol, &self.config.vs_currency)
    }
}

impl PriceSource for HttpPriceFetcher {
    fn fetch(&self, symbol: &str) -> Result<f64, FetchError> {
        let url = self.request_url(symbol)?;

        let price = self.config.retry.run(|attempt| {
            log::trace!("GET {} (attempt {})", url, attempt);
            self.fetch_once(&url, symbol)
        })?;

        log::debug!("Fetched price for {}: ${}", symbol, price);
        Ok(price)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Extract the price for `symbol` in `currency` from a response body
pub fn parse_price_response(body: &str, symbol: &str, currency: &str) -> Result<f64, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if !value.is_object() {
        return Err(FetchError::Malformed(
            "expected a JSON object at top level".to_string(),
        ));
    }

    value
        .get(symbol)
        .and_then(|entry| entry.get(currency))
        .and_then(Value::as_f64)
        .ok_or_else(|| FetchError::MissingPrice {
            symbol: symbol.to_string(),
            currency: currency.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        let body = r#"{"bitcoin": {"usd": 71000.5}}"#;
        assert_eq!(parse_price_response(body, "bitcoin", "usd"), Ok(71000.5));
    }

    #[test]
    fn test_parse_integer_price() {
        let body = r#"{"bitcoin": {"usd": 71000}}"#;
        assert_eq!(parse_price_response(body, "bitcoin", "usd"), Ok(71000.0));
    }

    #[test]
    fn test_parse_missing_symbol() {
        let body = r#"{}"#;
        assert!(matches!(
            parse_price_response(body, "bitcoin", "usd"),
            Err(FetchError::MissingPrice { .. })
        ));
    }

    #[test]
    fn test_parse_missing_currency() {
        let body = r#"{"bitcoin": {"eur": 65000}}"#;
        assert!(matches!(
            parse_price_response(body, "bitcoin", "usd"),
            Err(FetchError::MissingPrice { .. })
        ));
    }

    #[test]
    fn test_parse_non_numeric_price() {
        let body = r#"{"bitcoin": {"usd": "a lot"}}"#;
        assert!(matches!(
            parse_price_response(body, "bitcoin", "usd"),
            Err(FetchError::MissingPrice { .. })
        ));
    }

    #[test]
    fn test_parse_malformed_body() {
        assert!(matches!(
            parse_price_response("<html>", "bitcoin", "usd"),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            parse_price_response("[1, 2]", "bitcoin", "usd"),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_request_url() {
        let fetcher = HttpPriceFetcher::new(PriceFetcherConfig::default()).unwrap();
        let url = fetcher.request_url("bitcoin").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = PriceFetcherConfig {
            base_url: "not a url".to_string(),
            ..PriceFetcherConfig::default()
        };
        assert!(HttpPriceFetcher::new(config).is_err());
    }

    #[test]
    fn test_unreachable_host_is_fetch_error() {
        let config = PriceFetcherConfig {
            base_url: "http://127.0.0.1:9/simple/price".to_string(),
            timeout: Duration::from_millis(500),
            retry: RetryPolicy::immediate(2),
            ..PriceFetcherConfig::default()
        };
        let fetcher = HttpPriceFetcher::new(config).unwrap();
        assert!(matches!(
            fetcher.fetch("bitcoin"),
            Err(FetchError::RetriesExhausted { attempts: 2, .. })
        ));
    }
}
