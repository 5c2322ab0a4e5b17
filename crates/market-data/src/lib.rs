//! Price quote clients for the net worth tracker.
//!
//! Defines the [`QuoteProvider`] boundary the rate refresh cycle talks to,
//! plus thin HTTP implementations for the public quote APIs in use:
//! CoinGecko for crypto spot prices and Frankfurter (ECB reference rates)
//! for fiat currencies. All providers quote in USD per unit.

pub mod errors;
pub mod provider;
pub mod providers;

pub use errors::MarketDataError;
pub use provider::QuoteProvider;
pub use providers::coingecko::CoinGeckoProvider;
pub use providers::frankfurter::FrankfurterProvider;
