//! Currency identity resolution.

use log::{debug, info};
use std::sync::Arc;

use super::currencies_model::{
    Currency, CurrencyKind, NewCurrency, NewSourceIdentityMapping, RawCurrencyIdentity,
    TokenMetadata, ONCHAIN_SOURCE,
};
use super::currencies_traits::CurrencyRepositoryTrait;
use crate::errors::Result;

/// Maps raw source-reported identities onto canonical currencies,
/// creating canonical entries for previously unseen tokens.
///
/// Resolution is idempotent: the same identity always resolves to the
/// same canonical currency, and repeated resolution never creates a
/// duplicate.
#[derive(Clone)]
pub struct CurrencyResolver {
    repository: Arc<dyn CurrencyRepositoryTrait>,
}

impl CurrencyResolver {
    pub fn new(repository: Arc<dyn CurrencyRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Resolves a raw identity against the registry without creating
    /// anything.
    pub fn resolve(&self, identity: &RawCurrencyIdentity) -> Result<Option<Currency>> {
        match identity {
            RawCurrencyIdentity::Symbol(symbol) => self.repository.find_by_code(symbol),
            RawCurrencyIdentity::Contract { network, address } => self
                .repository
                .find_by_contract(network, &address.to_lowercase()),
            RawCurrencyIdentity::Native { network } => self.repository.find_native(network),
        }
    }

    /// Resolves a raw identity, creating a canonical currency on first
    /// sight where auto-creation applies.
    ///
    /// Auto-creation is limited to contract identities carrying token
    /// metadata: plain tickers and native markers with no mapping are a
    /// per-record mapping error for the caller to report, not a reason
    /// to invent a currency. New tokens are classified as generic
    /// `crypto`.
    pub async fn resolve_or_create(
        &self,
        identity: &RawCurrencyIdentity,
        metadata: Option<&TokenMetadata>,
    ) -> Result<Option<Currency>> {
        if let Some(currency) = self.resolve(identity)? {
            return Ok(Some(currency));
        }

        let (network, address) = match identity {
            RawCurrencyIdentity::Contract { network, address } => (network, address),
            _ => return Ok(None),
        };
        let Some(metadata) = metadata else {
            debug!("No metadata for {identity}, cannot auto-create");
            return Ok(None);
        };

        // The token's ticker may already be registered (same asset on
        // another network); map the contract onto it instead of creating
        // a duplicate code.
        let currency = match self.repository.find_by_code(&metadata.symbol)? {
            Some(existing) => existing,
            None => {
                let created = self
                    .repository
                    .create(NewCurrency {
                        id: None,
                        code: metadata.symbol.to_uppercase(),
                        kind: CurrencyKind::Crypto,
                        parent_currency_id: None,
                        name: metadata.name.clone(),
                    })
                    .await?;
                info!("Created new currency {} for {identity}", created.code);
                created
            }
        };

        self.repository
            .add_mapping(NewSourceIdentityMapping {
                currency_id: currency.id.clone(),
                source: ONCHAIN_SOURCE.to_string(),
                symbol: Some(metadata.symbol.to_uppercase()),
                network: Some(network.clone()),
                contract_address: Some(address.to_lowercase()),
                is_native: false,
                is_inverted: false,
            })
            .await?;

        Ok(Some(currency))
    }
}
