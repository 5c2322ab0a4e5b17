use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::net_worth_summary;
use crate::schema::net_worth_summary::dsl::*;

use networth_core::errors::Result;
use networth_core::net_worth::{NetWorthRepositoryTrait, NetWorthSummary};

use super::model::NetWorthSummaryDB;

/// Repository for daily net worth summary rows.
pub struct NetWorthRepository {
    pool: Arc<DbPool>,
}

impl NetWorthRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NetWorthRepositoryTrait for NetWorthRepository {
    async fn upsert(&self, summary: NetWorthSummary) -> Result<NetWorthSummary> {
        let mut conn = get_connection(&self.pool)?;
        let summary_db: NetWorthSummaryDB = summary.into();

        // Reruns on the same day replace the existing row for the date.
        diesel::replace_into(net_worth_summary::table)
            .values(&summary_db)
            .execute(&mut conn)
            .into_core()?;

        Ok(summary_db.into())
    }

    fn get_by_date(&self, summary_date: NaiveDate) -> Result<Option<NetWorthSummary>> {
        let mut conn = get_connection(&self.pool)?;

        let summary_db = net_worth_summary::table
            .select(NetWorthSummaryDB::as_select())
            .find(summary_date)
            .first::<NetWorthSummaryDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(summary_db.map(NetWorthSummary::from))
    }

    fn list(&self) -> Result<Vec<NetWorthSummary>> {
        let mut conn = get_connection(&self.pool)?;

        let results = net_worth_summary::table
            .select(NetWorthSummaryDB::as_select())
            .order(date.asc())
            .load::<NetWorthSummaryDB>(&mut conn)
            .into_core()?;

        Ok(results.into_iter().map(NetWorthSummary::from).collect())
    }
}
