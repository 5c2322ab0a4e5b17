//! Rate table domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One live rate per canonical currency: USD per unit, latest write wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRecord {
    pub currency_id: String,
    /// Base-currency units (USD) per one unit of the currency.
    pub rate: f64,
    /// Provider name; derived rates carry `"<source> (from <PARENT>)"`.
    pub source: String,
    pub updated_at: NaiveDateTime,
}

/// Input model for upserting a rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRate {
    pub currency_id: String,
    pub rate: f64,
    pub source: String,
}

/// A rate older than the staleness threshold, for operator reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleRate {
    pub currency_code: String,
    pub rate: f64,
    pub source: String,
    pub updated_at: NaiveDateTime,
    pub hours_old: f64,
}
