//! Run orchestration for the ingestion pipeline.

use chrono::NaiveDateTime;
use log::{error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::collector_traits::SourceCollector;
use super::normalizer::BalanceNormalizer;
use super::observation_model::{RawObservation, SourceSelection};
use super::reconciler::SnapshotReconciler;
use super::run_summary::{RunSummary, SourceFailure, UnvaluableRecord};
use super::valuation::ValuationEngine;
use super::writer::SnapshotWriter;
use crate::accounts::AccountRepositoryTrait;
use crate::currencies::{CurrencyRepositoryTrait, CurrencyResolver};
use crate::errors::Result;
use crate::rates::RateRepositoryTrait;
use crate::snapshots::SnapshotRepositoryTrait;

/// Wires the pipeline stages together and runs one ingestion batch:
/// collect, normalize, value, reconcile, commit.
pub struct IngestionService {
    account_repository: Arc<dyn AccountRepositoryTrait>,
    currency_repository: Arc<dyn CurrencyRepositoryTrait>,
    rate_repository: Arc<dyn RateRepositoryTrait>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    secondary_currency: String,
}

impl IngestionService {
    pub fn new(
        account_repository: Arc<dyn AccountRepositoryTrait>,
        currency_repository: Arc<dyn CurrencyRepositoryTrait>,
        rate_repository: Arc<dyn RateRepositoryTrait>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
        secondary_currency: String,
    ) -> Self {
        Self {
            account_repository,
            currency_repository,
            rate_repository,
            snapshot_repository,
            secondary_currency,
        }
    }

    /// Runs one ingestion batch over the collectors matching `selection`,
    /// committing a snapshot stamped with `timestamp`.
    ///
    /// Per-source and per-record failures are recovered locally and
    /// reported in the returned summary; only configuration and
    /// persistence errors abort.
    pub async fn run(
        &self,
        collectors: &[Arc<dyn SourceCollector>],
        selection: &SourceSelection,
        timestamp: NaiveDateTime,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::new(selection.clone(), timestamp);

        // Collect, one source at a time. A failed source contributes
        // nothing and the run continues.
        let mut observations: Vec<RawObservation> = Vec::new();
        for collector in collectors {
            if !selection.includes(collector.kind()) {
                continue;
            }
            info!("Fetching from {}...", collector.name());
            match collector.collect().await {
                Ok(mut batch) => {
                    info!("{}: fetched {} balances", collector.name(), batch.len());
                    observations.append(&mut batch);
                }
                Err(e) => {
                    error!("{}: failed to fetch balances - {}", collector.name(), e);
                    summary.source_failures.push(SourceFailure {
                        kind: collector.kind(),
                        name: collector.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        summary.collected = observations.len();

        if observations.is_empty() {
            warn!("No balances fetched from any source");
            return Ok(summary);
        }

        // Normalize: map identities, merge duplicates by summation.
        let resolver = CurrencyResolver::new(self.currency_repository.clone());
        let normalizer = BalanceNormalizer::new(self.account_repository.clone(), resolver);
        let output = normalizer.normalize(observations).await?;
        summary.normalized = output.balances.len();
        summary.unmapped = output.unmapped;

        // Value against the current rate table.
        let rates = self.rate_repository.get_all()?;
        let secondary_currency_id = self
            .currency_repository
            .find_by_code(&self.secondary_currency)?
            .map(|c| c.id);
        let engine = ValuationEngine::new(&rates, secondary_currency_id.as_deref());
        let mut valued = engine.value_all(output.balances);

        let currency_codes: HashMap<String, String> = self
            .currency_repository
            .list()?
            .into_iter()
            .map(|c| (c.id, c.code))
            .collect();
        summary.unvaluable = valued
            .iter()
            .filter(|b| !b.is_valuable())
            .map(|b| UnvaluableRecord {
                account_id: b.account_id.clone(),
                currency_code: currency_codes
                    .get(&b.currency_id)
                    .cloned()
                    .unwrap_or_else(|| b.currency_id.clone()),
                quantity: b.quantity,
            })
            .collect();

        // Reconcile disappeared holdings, but only when every configured
        // source contributed: a partial run is an incomplete picture and
        // must not zero holdings tracked by the sources it skipped.
        if selection.is_full() {
            let reconciler = SnapshotReconciler::new(self.snapshot_repository.clone());
            summary.zeroed = reconciler.reconcile(&mut valued)?;
        } else {
            info!("Skipping zero-balance check (partial run - incomplete picture)");
        }

        // Commit atomically.
        let writer = SnapshotWriter::new(self.snapshot_repository.clone());
        summary.inserted = writer.write(timestamp, valued).await?;
        info!("Inserted {} balance records", summary.inserted);

        Ok(summary)
    }
}
