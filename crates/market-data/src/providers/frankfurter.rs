//! Frankfurter fiat rate provider using ECB daily reference rates.
//!
//! The Frankfurter API publishes rates with EUR as the base currency, so
//! a USD-per-unit quote for another fiat currency is computed as the
//! cross-rate (EUR->USD) / (EUR->CCY). No API key is required.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::provider::QuoteProvider;

const FRANKFURTER_BASE_URL: &str = "https://api.frankfurter.app";

/// Response from the Frankfurter API for the latest rates.
#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    #[allow(dead_code)]
    base: String,
    /// Map of currency codes to EUR-based rates.
    rates: HashMap<String, f64>,
}

/// Frankfurter fiat rate provider.
pub struct FrankfurterProvider {
    client: reqwest::Client,
    base_url: String,
}

impl FrankfurterProvider {
    /// Creates a new Frankfurter provider with a default HTTP client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: FRANKFURTER_BASE_URL.to_string(),
        }
    }

    /// Overrides the API base URL (used by tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// USD per one unit of `code`, from EUR-based rates.
    fn usd_per_unit(eur_to_usd: f64, eur_to_code: f64) -> f64 {
        eur_to_usd / eur_to_code
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "frankfurter"
    }

    async fn fetch_price(&self, symbol: &str) -> Result<Option<f64>, MarketDataError> {
        let code = symbol.to_uppercase();
        if code == "USD" {
            return Ok(Some(1.0));
        }

        let url = format!("{}/latest?from=EUR&to=USD,{}", self.base_url, code);

        let response: FrankfurterResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| MarketDataError::Provider(e.to_string()))?
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        let eur_to_usd = match response.rates.get("USD") {
            Some(rate) => *rate,
            None => {
                return Err(MarketDataError::Parse(
                    "USD missing from Frankfurter response".to_string(),
                ))
            }
        };

        Ok(response
            .rates
            .get(&code)
            .map(|eur_to_code| Self::usd_per_unit(eur_to_usd, *eur_to_code)))
    }
}
