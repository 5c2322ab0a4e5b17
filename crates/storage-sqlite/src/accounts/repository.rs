use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::accounts;
use crate::schema::accounts::dsl::*;

use networth_core::accounts::{Account, AccountRepositoryTrait, NewAccount};
use networth_core::errors::Result;

use super::model::AccountDB;

/// Repository for managing account data in the database
pub struct AccountRepository {
    pool: Arc<DbPool>,
}

impl AccountRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        let mut conn = get_connection(&self.pool)?;
        let mut account_db: AccountDB = new_account.into();
        if account_db.id.is_empty() {
            account_db.id = uuid::Uuid::new_v4().to_string();
        }

        diesel::insert_into(accounts::table)
            .values(&account_db)
            .execute(&mut conn)
            .into_core()?;

        Ok(account_db.into())
    }

    async fn set_active(&self, account_id: &str, active: bool) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(accounts.find(account_id))
            .set((
                is_active.eq(active),
                updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(&mut conn)
            .into_core()?;

        let account = accounts
            .select(AccountDB::as_select())
            .find(account_id)
            .first::<AccountDB>(&mut conn)
            .into_core()?;
        Ok(account.into())
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;

        let account = accounts
            .select(AccountDB::as_select())
            .find(account_id)
            .first::<AccountDB>(&mut conn)
            .into_core()?;

        Ok(account.into())
    }

    fn find_by_name(&self, account_name: &str) -> Result<Option<Account>> {
        let mut conn = get_connection(&self.pool)?;

        let account = accounts
            .select(AccountDB::as_select())
            .filter(name.eq(account_name))
            .first::<AccountDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(account.map(Account::from))
    }

    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = accounts::table.into_boxed();
        if let Some(active) = is_active_filter {
            query = query.filter(is_active.eq(active));
        }

        let results = query
            .select(AccountDB::as_select())
            .order((is_active.desc(), name.asc()))
            .load::<AccountDB>(&mut conn)
            .into_core()?;

        Ok(results.into_iter().map(Account::from).collect())
    }
}
