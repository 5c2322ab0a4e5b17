//! Database model for balance snapshot rows.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use networth_core::snapshots::{BalanceSnapshotRow, NewBalanceRow};

/// Database model for balance snapshot rows. Append-only: rows are
/// never updated in place.
#[derive(
    Queryable,
    QueryableByName,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::balance_snapshot)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BalanceSnapshotDB {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub account_id: String,
    pub currency_id: String,
    pub quantity: f64,
    pub value_base: f64,
    pub value_secondary: Option<f64>,
}

impl BalanceSnapshotDB {
    /// Builds one insertable row for a snapshot stamped `timestamp`.
    pub fn from_new_row(row: NewBalanceRow, timestamp: NaiveDateTime) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            account_id: row.account_id,
            currency_id: row.currency_id,
            quantity: row.quantity,
            value_base: row.value_base,
            value_secondary: row.value_secondary,
        }
    }
}

impl From<BalanceSnapshotDB> for BalanceSnapshotRow {
    fn from(db: BalanceSnapshotDB) -> Self {
        Self {
            id: db.id,
            timestamp: db.timestamp,
            account_id: db.account_id,
            currency_id: db.currency_id,
            quantity: db.quantity,
            value_base: db.value_base,
            value_secondary: db.value_secondary,
        }
    }
}
