use async_trait::async_trait;

use crate::errors::MarketDataError;

/// A source of current prices, quoted in USD per one unit of the symbol.
///
/// The symbol format is provider-specific (a CoinGecko coin id, a fiat
/// code, ...); the mapping from canonical currency to provider symbol
/// lives in the database, not here.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Provider name as recorded in symbol mappings and rate provenance.
    fn name(&self) -> &str;

    /// Fetches the current price for a symbol.
    ///
    /// Returns `Ok(None)` when the provider has no quote for the symbol;
    /// errors are reserved for transport or protocol failures.
    async fn fetch_price(&self, symbol: &str) -> Result<Option<f64>, MarketDataError>;
}
