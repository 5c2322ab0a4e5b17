//! Currency repository trait.

use async_trait::async_trait;

use super::currencies_model::{
    Currency, NewCurrency, NewSourceIdentityMapping, SourceIdentityMapping,
};
use crate::errors::Result;

/// Trait defining the contract for currency registry operations.
///
/// Canonical currencies are never deleted; historical snapshot rows
/// reference them forever.
#[async_trait]
pub trait CurrencyRepositoryTrait: Send + Sync {
    /// Creates a new canonical currency.
    async fn create(&self, new_currency: NewCurrency) -> Result<Currency>;

    /// Records a source identity mapping for an existing currency.
    async fn add_mapping(
        &self,
        mapping: NewSourceIdentityMapping,
    ) -> Result<SourceIdentityMapping>;

    /// Retrieves a currency by its ID.
    fn get_by_id(&self, currency_id: &str) -> Result<Currency>;

    /// Looks up a currency by code, case-insensitively.
    fn find_by_code(&self, code: &str) -> Result<Option<Currency>>;

    /// Looks up the currency mapped to a contract address on a network.
    /// The address comparison is case-insensitive.
    fn find_by_contract(&self, network: &str, address: &str) -> Result<Option<Currency>>;

    /// Looks up the native currency of a network.
    fn find_native(&self, network: &str) -> Result<Option<Currency>>;

    /// Lists all canonical currencies.
    fn list(&self) -> Result<Vec<Currency>>;

    /// Lists identity mappings recorded for one source.
    fn list_mappings_for_source(&self, source: &str) -> Result<Vec<SourceIdentityMapping>>;
}
