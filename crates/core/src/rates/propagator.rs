//! Parent-to-child rate propagation.

use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

use super::rates_model::{NewRate, RateRecord};
use super::rates_traits::RateRepositoryTrait;
use crate::currencies::CurrencyRepositoryTrait;
use crate::errors::Result;

/// Copies a parent currency's rate to every currency declared as a
/// derivative/wrapped variant of it (e.g. a liquid-staking receipt token
/// inherits its underlying asset's price).
///
/// Must run after direct rate fetching and before valuation: children
/// have no direct rate source of their own.
pub struct RatePropagator {
    currency_repository: Arc<dyn CurrencyRepositoryTrait>,
    rate_repository: Arc<dyn RateRepositoryTrait>,
}

impl RatePropagator {
    pub fn new(
        currency_repository: Arc<dyn CurrencyRepositoryTrait>,
        rate_repository: Arc<dyn RateRepositoryTrait>,
    ) -> Self {
        Self {
            currency_repository,
            rate_repository,
        }
    }

    /// Upserts every child rate from its parent's current rate.
    ///
    /// A self-referencing parent is skipped; a parent without a rate
    /// leaves the child without one this cycle. Returns the number of
    /// child rates written.
    pub async fn propagate(&self) -> Result<usize> {
        let currencies = self.currency_repository.list()?;
        let rates: HashMap<String, RateRecord> = self
            .rate_repository
            .get_all()?
            .into_iter()
            .map(|r| (r.currency_id.clone(), r))
            .collect();
        let codes_by_id: HashMap<&str, &str> = currencies
            .iter()
            .map(|c| (c.id.as_str(), c.code.as_str()))
            .collect();

        let mut updated = 0;
        for child in &currencies {
            let Some(parent_id) = child.effective_parent_id() else {
                continue;
            };
            let Some(parent_rate) = rates.get(parent_id) else {
                debug!(
                    "Parent of {} has no rate yet, leaving child without one",
                    child.code
                );
                continue;
            };
            let parent_code = codes_by_id.get(parent_id).copied().unwrap_or(parent_id);

            self.rate_repository
                .upsert(NewRate {
                    currency_id: child.id.clone(),
                    rate: parent_rate.rate,
                    source: format!("{} (from {})", parent_rate.source, parent_code),
                })
                .await?;
            info!(
                "Propagated rate {} <- {}: {}",
                child.code, parent_code, parent_rate.rate
            );
            updated += 1;
        }

        Ok(updated)
    }
}
