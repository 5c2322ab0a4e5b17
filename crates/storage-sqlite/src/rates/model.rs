//! Database model for the rate table.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use networth_core::rates::{NewRate, RateRecord};

/// Database model for the rate table
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
#[diesel(table_name = crate::schema::rate_table)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RateDB {
    pub currency_id: String,
    pub rate: f64,
    pub source: String,
    pub updated_at: NaiveDateTime,
}

impl From<RateDB> for RateRecord {
    fn from(db: RateDB) -> Self {
        Self {
            currency_id: db.currency_id,
            rate: db.rate,
            source: db.source,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewRate> for RateDB {
    fn from(domain: NewRate) -> Self {
        Self {
            currency_id: domain.currency_id,
            rate: domain.rate,
            source: domain.source,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
