//! Balance normalization: raw observations to canonical balances.

use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::observation_model::{NormalizedBalance, RawObservation};
use crate::accounts::AccountRepositoryTrait;
use crate::currencies::{CurrencyResolver, RawCurrencyIdentity};
use crate::errors::Result;

/// Why a raw observation could not be mapped onto a canonical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnmappedReason {
    UnknownAccount,
    UnknownCurrency,
    UnknownContract,
}

impl std::fmt::Display for UnmappedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmappedReason::UnknownAccount => f.write_str("unknown account"),
            UnmappedReason::UnknownCurrency => f.write_str("unknown currency"),
            UnmappedReason::UnknownContract => f.write_str("unknown contract"),
        }
    }
}

/// An excluded observation, kept for the end-of-run summary.
#[derive(Debug, Clone)]
pub struct UnmappedRecord {
    pub reason: UnmappedReason,
    pub detail: String,
    pub quantity: f64,
}

/// Output of one normalization pass.
#[derive(Debug, Default)]
pub struct NormalizerOutput {
    /// Exactly one record per distinct (account, currency) pair.
    pub balances: Vec<NormalizedBalance>,
    /// Observations excluded with a recorded reason; never aborts a run.
    pub unmapped: Vec<UnmappedRecord>,
}

/// Merges raw observations from any number of source collectors into
/// canonical `(account, currency, quantity)` records.
///
/// Quantities for the same pair are summed across all observations in
/// the run: a currency may appear in several sub-accounts of one
/// exchange, or the same wallet may be queried on more than one path.
pub struct BalanceNormalizer {
    account_repository: Arc<dyn AccountRepositoryTrait>,
    resolver: CurrencyResolver,
}

impl BalanceNormalizer {
    pub fn new(
        account_repository: Arc<dyn AccountRepositoryTrait>,
        resolver: CurrencyResolver,
    ) -> Self {
        Self {
            account_repository,
            resolver,
        }
    }

    /// Normalizes one run's worth of observations. Input order is
    /// irrelevant; output pairs are unique.
    pub async fn normalize(&self, observations: Vec<RawObservation>) -> Result<NormalizerOutput> {
        let accounts_by_name: HashMap<String, String> = self
            .account_repository
            .list(Some(true))?
            .into_iter()
            .map(|a| (a.name.clone(), a.id))
            .collect();

        // BTreeMap keeps output deterministic for tests and logs.
        let mut merged: BTreeMap<(String, String), f64> = BTreeMap::new();
        let mut unmapped = Vec::new();

        for observation in observations {
            match self.map_observation(observation, &accounts_by_name).await? {
                Ok((account_id, currency_id, quantity)) => {
                    *merged.entry((account_id, currency_id)).or_insert(0.0) += quantity;
                }
                Err(record) => {
                    warn!(
                        "Excluding observation ({}): {}",
                        record.reason, record.detail
                    );
                    unmapped.push(record);
                }
            }
        }

        let balances = merged
            .into_iter()
            .map(|((account_id, currency_id), quantity)| NormalizedBalance {
                account_id,
                currency_id,
                quantity,
            })
            .collect();

        Ok(NormalizerOutput { balances, unmapped })
    }

    /// Maps one observation to (account, currency, quantity), or to the
    /// unmapped record describing why it was excluded.
    async fn map_observation(
        &self,
        observation: RawObservation,
        accounts_by_name: &HashMap<String, String>,
    ) -> Result<std::result::Result<(String, String, f64), UnmappedRecord>> {
        match observation {
            RawObservation::Exchange {
                account_id,
                symbol,
                quantity,
            } => {
                let identity = RawCurrencyIdentity::Symbol(symbol);
                match self.resolver.resolve(&identity)? {
                    Some(currency) => Ok(Ok((account_id, currency.id, quantity))),
                    None => Ok(Err(UnmappedRecord {
                        reason: UnmappedReason::UnknownCurrency,
                        detail: identity.to_string(),
                        quantity,
                    })),
                }
            }
            RawObservation::Wallet {
                account_id,
                network,
                contract_address,
                metadata,
                quantity,
            } => {
                let identity = match contract_address {
                    Some(address) => RawCurrencyIdentity::Contract { network, address },
                    None => RawCurrencyIdentity::Native { network },
                };
                match self
                    .resolver
                    .resolve_or_create(&identity, metadata.as_ref())
                    .await?
                {
                    Some(currency) => Ok(Ok((account_id, currency.id, quantity))),
                    None => Ok(Err(UnmappedRecord {
                        reason: UnmappedReason::UnknownContract,
                        detail: identity.to_string(),
                        quantity,
                    })),
                }
            }
            RawObservation::Spreadsheet {
                account_name,
                currency_code,
                quantity,
            } => {
                let Some(account_id) = accounts_by_name.get(&account_name) else {
                    return Ok(Err(UnmappedRecord {
                        reason: UnmappedReason::UnknownAccount,
                        detail: format!("account '{account_name}'"),
                        quantity,
                    }));
                };
                let identity = RawCurrencyIdentity::Symbol(currency_code);
                match self.resolver.resolve(&identity)? {
                    Some(currency) => Ok(Ok((account_id.clone(), currency.id, quantity))),
                    None => Ok(Err(UnmappedRecord {
                        reason: UnmappedReason::UnknownCurrency,
                        detail: identity.to_string(),
                        quantity,
                    })),
                }
            }
        }
    }
}
