//! Net worth summary calculation and recording.

use chrono::NaiveDate;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::net_worth_model::NetWorthSummary;
use super::net_worth_traits::NetWorthRepositoryTrait;
use crate::accounts::AccountRepositoryTrait;
use crate::errors::Result;
use crate::snapshots::SnapshotRepositoryTrait;

/// Aggregates the latest balance per holding into a daily summary row.
pub struct NetWorthService {
    account_repository: Arc<dyn AccountRepositoryTrait>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    repository: Arc<dyn NetWorthRepositoryTrait>,
}

impl NetWorthService {
    pub fn new(
        account_repository: Arc<dyn AccountRepositoryTrait>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
        repository: Arc<dyn NetWorthRepositoryTrait>,
    ) -> Self {
        Self {
            account_repository,
            snapshot_repository,
            repository,
        }
    }

    /// Computes the summary over the current latest balances without
    /// persisting it. Returns `None` when there are no balances.
    pub fn compute(&self, date: NaiveDate) -> Result<Option<NetWorthSummary>> {
        let balances = self.snapshot_repository.latest_balances()?;
        if balances.is_empty() {
            return Ok(None);
        }

        let liability_by_account: HashMap<String, bool> = self
            .account_repository
            .list(None)?
            .into_iter()
            .map(|a| (a.id, a.is_liability))
            .collect();

        let mut summary = NetWorthSummary {
            date,
            assets_base: 0.0,
            assets_secondary: 0.0,
            liabilities_base: 0.0,
            liabilities_secondary: 0.0,
            net_worth_base: 0.0,
            net_worth_secondary: 0.0,
            num_balances: balances.len() as i64,
        };

        for balance in &balances {
            let is_liability = liability_by_account
                .get(&balance.account_id)
                .copied()
                .unwrap_or(false);
            let secondary = balance.value_secondary.unwrap_or(0.0);
            if is_liability {
                summary.liabilities_base += balance.value_base;
                summary.liabilities_secondary += secondary;
            } else {
                summary.assets_base += balance.value_base;
                summary.assets_secondary += secondary;
            }
        }
        summary.net_worth_base = summary.assets_base - summary.liabilities_base;
        summary.net_worth_secondary = summary.assets_secondary - summary.liabilities_secondary;

        Ok(Some(summary))
    }

    /// Computes and upserts the summary for `date`. Safe to run any
    /// number of times per day: the existing row for the date is
    /// replaced. Returns `None` (a no-op) when there are no balances.
    pub async fn record(&self, date: NaiveDate) -> Result<Option<NetWorthSummary>> {
        let Some(summary) = self.compute(date)? else {
            warn!("No balances found, skipping net worth snapshot");
            return Ok(None);
        };

        let action = match self.repository.get_by_date(date)? {
            Some(_) => "Updated",
            None => "Created",
        };
        let stored = self.repository.upsert(summary).await?;
        info!(
            "{action} snapshot for {}: assets={:.2}, liabilities={:.2}, net worth={:.2} ({} balances)",
            stored.date,
            stored.assets_base,
            stored.liabilities_base,
            stored.net_worth_base,
            stored.num_balances
        );
        Ok(Some(stored))
    }
}
