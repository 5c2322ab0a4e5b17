use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::rate_table;

use networth_core::errors::Result;
use networth_core::rates::{NewRate, RateRecord, RateRepositoryTrait};

use super::model::RateDB;

/// Repository for the live rate table: one row per currency, upsert
/// semantics with latest write winning.
pub struct RateRepository {
    pool: Arc<DbPool>,
}

impl RateRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateRepositoryTrait for RateRepository {
    async fn upsert(&self, rate: NewRate) -> Result<RateRecord> {
        let mut conn = get_connection(&self.pool)?;
        let rate_db: RateDB = rate.into();

        diesel::insert_into(rate_table::table)
            .values(&rate_db)
            .on_conflict(rate_table::currency_id)
            .do_update()
            .set((
                rate_table::rate.eq(rate_db.rate),
                rate_table::source.eq(rate_db.source.clone()),
                rate_table::updated_at.eq(rate_db.updated_at),
            ))
            .execute(&mut conn)
            .into_core()?;

        Ok(rate_db.into())
    }

    fn get_for_currency(&self, currency_id: &str) -> Result<Option<RateRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let rate_db = rate_table::table
            .select(RateDB::as_select())
            .find(currency_id)
            .first::<RateDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(rate_db.map(RateRecord::from))
    }

    fn get_all(&self) -> Result<Vec<RateRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let results = rate_table::table
            .select(RateDB::as_select())
            .load::<RateDB>(&mut conn)
            .into_core()?;

        Ok(results.into_iter().map(RateRecord::from).collect())
    }
}
