//! Net worth summary repository trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::net_worth_model::NetWorthSummary;
use crate::errors::Result;

/// Trait defining the contract for net worth summary persistence.
#[async_trait]
pub trait NetWorthRepositoryTrait: Send + Sync {
    /// Inserts or replaces the summary for its date.
    async fn upsert(&self, summary: NetWorthSummary) -> Result<NetWorthSummary>;

    /// Returns the summary for a date, if any.
    fn get_by_date(&self, date: NaiveDate) -> Result<Option<NetWorthSummary>>;

    /// Returns the full history, oldest first.
    fn list(&self) -> Result<Vec<NetWorthSummary>>;
}
