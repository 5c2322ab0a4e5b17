//! Rate repository trait.

use async_trait::async_trait;

use super::rates_model::{NewRate, RateRecord};
use crate::errors::Result;

/// Trait defining the contract for rate table operations.
#[async_trait]
pub trait RateRepositoryTrait: Send + Sync {
    /// Inserts or replaces the live rate for a currency.
    async fn upsert(&self, rate: NewRate) -> Result<RateRecord>;

    /// Returns the live rate for a currency, if any.
    fn get_for_currency(&self, currency_id: &str) -> Result<Option<RateRecord>>;

    /// Returns every live rate.
    fn get_all(&self) -> Result<Vec<RateRecord>>;
}
