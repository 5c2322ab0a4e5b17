//! CoinGecko crypto price provider implementation.
//!
//! Uses CoinGecko's free `/simple/price` endpoint. The symbol passed to
//! [`fetch_price`] is a CoinGecko coin id (e.g. `bitcoin`), not a ticker;
//! symbol mappings in the database carry the id per currency.
//!
//! No API key is required for basic usage, though rate limits apply.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::provider::QuoteProvider;

const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";

/// Response from `/simple/price`: coin id -> { quote currency -> price }.
#[derive(Debug, Deserialize)]
struct SimplePriceResponse(HashMap<String, HashMap<String, f64>>);

/// CoinGecko crypto price provider.
pub struct CoinGeckoProvider {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider with a default HTTP client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: COINGECKO_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL (used by tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch_price(&self, symbol: &str) -> Result<Option<f64>, MarketDataError> {
        let coin_id = symbol.to_lowercase();
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.base_url, coin_id
        );

        let response: SimplePriceResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| MarketDataError::Provider(e.to_string()))?
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        Ok(response
            .0
            .get(&coin_id)
            .and_then(|quotes| quotes.get("usd"))
            .copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "bitcoin": { "usd": 65000.0 },
        "ethereum": { "usd": 3100.25 }
    }"#;

    #[test]
    fn parses_simple_price_response() {
        let response: SimplePriceResponse =
            serde_json::from_str(SAMPLE_RESPONSE).expect("Failed to parse response");

        assert!((response.0["bitcoin"]["usd"] - 65000.0).abs() < f64::EPSILON);
        assert!((response.0["ethereum"]["usd"] - 3100.25).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_coin_yields_none() {
        let response: SimplePriceResponse =
            serde_json::from_str(SAMPLE_RESPONSE).expect("Failed to parse response");

        assert!(response.0.get("dogecoin").is_none());
    }

    #[test]
    fn provider_name() {
        assert_eq!(CoinGeckoProvider::new().name(), "coingecko");
    }
}
