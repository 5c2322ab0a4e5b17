use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_query;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::{IntoCore, StorageError};
use crate::schema::balance_snapshot;

use networth_core::errors::Result;
use networth_core::snapshots::{
    BalanceSnapshotRow, HoldingKey, NewBalanceRow, SnapshotRepositoryTrait,
};

use super::model::BalanceSnapshotDB;

#[derive(QueryableByName)]
struct HoldingKeyRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    account_id: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    currency_id: String,
}

/// Repository for the append-only balance snapshot history.
pub struct SnapshotRepository {
    pool: Arc<DbPool>,
}

impl SnapshotRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SnapshotRepository {
    async fn insert_snapshot(
        &self,
        timestamp: NaiveDateTime,
        rows: Vec<NewBalanceRow>,
    ) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;

        // All-or-nothing: any per-row error (foreign key violation,
        // constraint failure) rolls the whole snapshot back.
        conn.immediate_transaction::<_, StorageError, _>(|conn| {
            let mut inserted = 0;
            for row in rows {
                let row_db = BalanceSnapshotDB::from_new_row(row, timestamp);
                diesel::insert_into(balance_snapshot::table)
                    .values(&row_db)
                    .execute(conn)?;
                inserted += 1;
            }
            Ok(inserted)
        })
        .map_err(|e| e.into())
    }

    fn latest_nonzero_holdings(&self) -> Result<Vec<HoldingKey>> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<HoldingKeyRow> = sql_query(
            r#"SELECT b.account_id, b.currency_id
               FROM balance_snapshot b
               INNER JOIN (
                   SELECT account_id, currency_id, MAX(timestamp) AS max_timestamp
                   FROM balance_snapshot
                   GROUP BY account_id, currency_id
               ) latest
                 ON b.account_id = latest.account_id
                AND b.currency_id = latest.currency_id
                AND b.timestamp = latest.max_timestamp
               WHERE b.quantity > 0"#,
        )
        .load(&mut conn)
        .into_core()?;

        Ok(rows
            .into_iter()
            .map(|row| HoldingKey {
                account_id: row.account_id,
                currency_id: row.currency_id,
            })
            .collect())
    }

    fn latest_balances(&self) -> Result<Vec<BalanceSnapshotRow>> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<BalanceSnapshotDB> = sql_query(
            r#"SELECT b.*
               FROM balance_snapshot b
               INNER JOIN (
                   SELECT account_id, currency_id, MAX(timestamp) AS max_timestamp
                   FROM balance_snapshot
                   GROUP BY account_id, currency_id
               ) latest
                 ON b.account_id = latest.account_id
                AND b.currency_id = latest.currency_id
                AND b.timestamp = latest.max_timestamp
               ORDER BY b.account_id, b.currency_id"#,
        )
        .load(&mut conn)
        .into_core()?;

        Ok(rows.into_iter().map(BalanceSnapshotRow::from).collect())
    }
}
