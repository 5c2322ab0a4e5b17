//! Snapshot reconciliation: explicit zero rows for disappeared holdings.

use log::info;
use std::collections::HashSet;
use std::sync::Arc;

use super::observation_model::ValuedBalance;
use crate::errors::Result;
use crate::snapshots::SnapshotRepositoryTrait;

/// Compares the current run's holdings against the most recent prior
/// snapshot and synthesizes zero-quantity rows for holdings that
/// disappeared (sold or transferred out), so history never shows stale
/// nonzero balances.
///
/// The caller must only invoke this on full runs: absence from a partial
/// run means "source wasn't queried", not "asset gone". A transient
/// collector failure during a full run is indistinguishable from a sale
/// and will zero the holding; the run summary surfaces both so the
/// operator can catch it.
pub struct SnapshotReconciler {
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl SnapshotReconciler {
    pub fn new(snapshot_repository: Arc<dyn SnapshotRepositoryTrait>) -> Self {
        Self { snapshot_repository }
    }

    /// Appends a zero row (quantity 0, values 0) for every holding whose
    /// most recent snapshot quantity was nonzero and which is absent
    /// from the current batch. Returns the number of rows added.
    pub fn reconcile(&self, balances: &mut Vec<ValuedBalance>) -> Result<usize> {
        let current: HashSet<(String, String)> = balances
            .iter()
            .map(|b| (b.account_id.clone(), b.currency_id.clone()))
            .collect();

        let mut zeroed = 0;
        for holding in self.snapshot_repository.latest_nonzero_holdings()? {
            let key = (holding.account_id.clone(), holding.currency_id.clone());
            if current.contains(&key) {
                continue;
            }
            balances.push(ValuedBalance {
                account_id: holding.account_id,
                currency_id: holding.currency_id,
                quantity: 0.0,
                value_base: Some(0.0),
                value_secondary: Some(0.0),
            });
            zeroed += 1;
        }

        if zeroed > 0 {
            info!("Found {zeroed} previously held assets now at zero");
        }
        Ok(zeroed)
    }
}
