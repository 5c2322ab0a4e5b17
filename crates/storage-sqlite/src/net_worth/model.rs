//! Database model for daily net worth summaries.

use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use networth_core::net_worth::NetWorthSummary;

/// Database model for daily net worth summaries, keyed on the date.
#[derive(
    Queryable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::net_worth_summary)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NetWorthSummaryDB {
    pub date: NaiveDate,
    pub assets_base: f64,
    pub assets_secondary: f64,
    pub liabilities_base: f64,
    pub liabilities_secondary: f64,
    pub net_worth_base: f64,
    pub net_worth_secondary: f64,
    pub num_balances: i64,
}

impl From<NetWorthSummaryDB> for NetWorthSummary {
    fn from(db: NetWorthSummaryDB) -> Self {
        Self {
            date: db.date,
            assets_base: db.assets_base,
            assets_secondary: db.assets_secondary,
            liabilities_base: db.liabilities_base,
            liabilities_secondary: db.liabilities_secondary,
            net_worth_base: db.net_worth_base,
            net_worth_secondary: db.net_worth_secondary,
            num_balances: db.num_balances,
        }
    }
}

impl From<NetWorthSummary> for NetWorthSummaryDB {
    fn from(domain: NetWorthSummary) -> Self {
        Self {
            date: domain.date,
            assets_base: domain.assets_base,
            assets_secondary: domain.assets_secondary,
            liabilities_base: domain.liabilities_base,
            liabilities_secondary: domain.liabilities_secondary,
            net_worth_base: domain.net_worth_base,
            net_worth_secondary: domain.net_worth_secondary,
            num_balances: domain.num_balances,
        }
    }
}
