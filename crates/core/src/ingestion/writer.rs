//! Snapshot writing: the atomic, deduplicated commit.

use chrono::NaiveDateTime;
use log::debug;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::observation_model::ValuedBalance;
use crate::errors::Result;
use crate::snapshots::{NewBalanceRow, SnapshotRepositoryTrait};

/// Commits the final balance set as one timestamped snapshot.
///
/// Unvaluable records (no base value) are filtered out; duplicate
/// (account, currency) keys surviving upstream merges are aggregated by
/// summation, never written as duplicate rows for the same timestamp.
/// The insert itself is all-or-nothing.
pub struct SnapshotWriter {
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl SnapshotWriter {
    pub fn new(snapshot_repository: Arc<dyn SnapshotRepositoryTrait>) -> Self {
        Self { snapshot_repository }
    }

    /// Writes one snapshot. Returns the number of rows committed.
    pub async fn write(
        &self,
        timestamp: NaiveDateTime,
        balances: Vec<ValuedBalance>,
    ) -> Result<usize> {
        let mut merged: BTreeMap<(String, String), NewBalanceRow> = BTreeMap::new();

        for balance in balances {
            let Some(value_base) = balance.value_base else {
                debug!(
                    "Skipping unvaluable balance ({}, {})",
                    balance.account_id, balance.currency_id
                );
                continue;
            };

            let key = (balance.account_id.clone(), balance.currency_id.clone());
            match merged.get_mut(&key) {
                Some(row) => {
                    row.quantity += balance.quantity;
                    row.value_base += value_base;
                    row.value_secondary = match (row.value_secondary, balance.value_secondary) {
                        (Some(a), Some(b)) => Some(a + b),
                        _ => None,
                    };
                }
                None => {
                    merged.insert(
                        key,
                        NewBalanceRow {
                            account_id: balance.account_id,
                            currency_id: balance.currency_id,
                            quantity: balance.quantity,
                            value_base,
                            value_secondary: balance.value_secondary,
                        },
                    );
                }
            }
        }

        let rows: Vec<NewBalanceRow> = merged.into_values().collect();
        if rows.is_empty() {
            return Ok(0);
        }
        self.snapshot_repository
            .insert_snapshot(timestamp, rows)
            .await
    }
}
