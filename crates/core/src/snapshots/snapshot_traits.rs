//! Snapshot repository trait.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::snapshot_model::{BalanceSnapshotRow, HoldingKey, NewBalanceRow};
use crate::errors::Result;

/// Trait defining the contract for balance snapshot persistence.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Inserts every row with the given timestamp inside one
    /// all-or-nothing transaction. Any per-row error rolls the whole
    /// snapshot back; partial snapshots are never visible to readers.
    ///
    /// Returns the number of rows inserted.
    async fn insert_snapshot(
        &self,
        timestamp: NaiveDateTime,
        rows: Vec<NewBalanceRow>,
    ) -> Result<usize>;

    /// Holdings whose most recent snapshot row has a nonzero quantity.
    /// "Most recent" means the row with the maximum timestamp per
    /// (account, currency), regardless of wall-clock ordering of runs.
    fn latest_nonzero_holdings(&self) -> Result<Vec<HoldingKey>>;

    /// The most recent snapshot row per (account, currency).
    fn latest_balances(&self) -> Result<Vec<BalanceSnapshotRow>>;
}
