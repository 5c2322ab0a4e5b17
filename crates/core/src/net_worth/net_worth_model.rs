//! Net worth summary domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row per calendar day: aggregated assets, liabilities, and net
/// worth in both valuation units. Upserted on the date key, so reruns
/// on the same day overwrite rather than duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthSummary {
    pub date: NaiveDate,
    pub assets_base: f64,
    pub assets_secondary: f64,
    pub liabilities_base: f64,
    pub liabilities_secondary: f64,
    pub net_worth_base: f64,
    pub net_worth_secondary: f64,
    /// Number of latest balance rows the summary was computed from.
    pub num_balances: i64,
}
