//! Balance snapshot domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One persisted balance row. Immutable once written: each ingestion run
/// inserts new rows with a new timestamp, never updates in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshotRow {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub account_id: String,
    pub currency_id: String,
    pub quantity: f64,
    pub value_base: f64,
    pub value_secondary: Option<f64>,
}

/// Input model for one row of a snapshot being written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBalanceRow {
    pub account_id: String,
    pub currency_id: String,
    pub quantity: f64,
    pub value_base: f64,
    pub value_secondary: Option<f64>,
}

/// An (account, currency) pair identifying one holding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingKey {
    pub account_id: String,
    pub currency_id: String,
}
