//! Rate refresh cycle: direct provider fetches, inversion, propagation,
//! staleness reporting.

use chrono::NaiveDateTime;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::propagator::RatePropagator;
use super::rates_model::{NewRate, StaleRate};
use super::rates_traits::RateRepositoryTrait;
use crate::currencies::CurrencyRepositoryTrait;
use crate::errors::Result;
use networth_market_data::QuoteProvider;

/// Outcome of one refresh cycle.
#[derive(Debug, Default)]
pub struct RateRefreshOutcome {
    /// Currencies updated from a direct provider quote.
    pub updated: usize,
    /// Child currencies updated by parent propagation.
    pub propagated: usize,
    /// (currency code, reason) per failed symbol; never fatal.
    pub failures: Vec<(String, String)>,
}

impl RateRefreshOutcome {
    pub fn total_updated(&self) -> usize {
        self.updated + self.propagated
    }
}

/// Fetches direct rates for every parent-less currency with a symbol
/// mapping for a configured provider, then propagates to derivatives.
pub struct RateRefreshService {
    currency_repository: Arc<dyn CurrencyRepositoryTrait>,
    rate_repository: Arc<dyn RateRepositoryTrait>,
    providers: Vec<Arc<dyn QuoteProvider>>,
}

impl RateRefreshService {
    pub fn new(
        currency_repository: Arc<dyn CurrencyRepositoryTrait>,
        rate_repository: Arc<dyn RateRepositoryTrait>,
        providers: Vec<Arc<dyn QuoteProvider>>,
    ) -> Self {
        Self {
            currency_repository,
            rate_repository,
            providers,
        }
    }

    /// Runs one refresh cycle. Per-symbol failures are collected in the
    /// outcome; only repository errors abort.
    pub async fn refresh(&self) -> Result<RateRefreshOutcome> {
        let currencies_by_id: HashMap<String, _> = self
            .currency_repository
            .list()?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        let mut outcome = RateRefreshOutcome::default();

        for provider in &self.providers {
            let mappings = self
                .currency_repository
                .list_mappings_for_source(provider.name())?;
            info!(
                "Fetching {} symbols from {}",
                mappings.len(),
                provider.name()
            );

            for mapping in mappings {
                let Some(symbol) = mapping.symbol.as_deref() else {
                    continue;
                };
                let Some(currency) = currencies_by_id.get(&mapping.currency_id) else {
                    continue;
                };
                // Derivatives inherit from their parent in the
                // propagation step; their own mappings are not fetched.
                if currency.effective_parent_id().is_some() {
                    continue;
                }

                match provider.fetch_price(symbol).await {
                    Ok(Some(price)) => {
                        let rate = if mapping.is_inverted {
                            if price == 0.0 {
                                outcome
                                    .failures
                                    .push((currency.code.clone(), "zero price".to_string()));
                                continue;
                            }
                            1.0 / price
                        } else {
                            price
                        };
                        self.rate_repository
                            .upsert(NewRate {
                                currency_id: currency.id.clone(),
                                rate,
                                source: provider.name().to_string(),
                            })
                            .await?;
                        info!("Updated {}: {}", currency.code, rate);
                        outcome.updated += 1;
                    }
                    Ok(None) => {
                        warn!("No price for {} ({})", currency.code, symbol);
                        outcome
                            .failures
                            .push((currency.code.clone(), "no price returned".to_string()));
                    }
                    Err(e) => {
                        warn!("Failed to fetch {} ({}): {}", currency.code, symbol, e);
                        outcome.failures.push((currency.code.clone(), e.to_string()));
                    }
                }
            }
        }

        let propagator = RatePropagator::new(
            self.currency_repository.clone(),
            self.rate_repository.clone(),
        );
        outcome.propagated = propagator.propagate().await?;

        Ok(outcome)
    }

    /// Rates older than `max_age_hours` as of `now`, oldest first.
    pub fn stale_rates(&self, max_age_hours: i64, now: NaiveDateTime) -> Result<Vec<StaleRate>> {
        let codes_by_id: HashMap<String, String> = self
            .currency_repository
            .list()?
            .into_iter()
            .map(|c| (c.id, c.code))
            .collect();

        let mut stale: Vec<StaleRate> = self
            .rate_repository
            .get_all()?
            .into_iter()
            .filter_map(|rate| {
                let hours_old = (now - rate.updated_at).num_minutes() as f64 / 60.0;
                if hours_old <= max_age_hours as f64 {
                    return None;
                }
                Some(StaleRate {
                    currency_code: codes_by_id
                        .get(&rate.currency_id)
                        .cloned()
                        .unwrap_or_else(|| rate.currency_id.clone()),
                    rate: rate.rate,
                    source: rate.source,
                    updated_at: rate.updated_at,
                    hours_old,
                })
            })
            .collect();

        stale.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));
        Ok(stale)
    }
}
