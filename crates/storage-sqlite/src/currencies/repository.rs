use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::{currencies, source_identity_mappings};

use networth_core::currencies::{
    Currency, CurrencyRepositoryTrait, NewCurrency, NewSourceIdentityMapping,
    SourceIdentityMapping,
};
use networth_core::errors::Result;

use super::model::{CurrencyDB, SourceIdentityMappingDB};

/// Repository for the canonical currency registry.
pub struct CurrencyRepository {
    pool: Arc<DbPool>,
}

impl CurrencyRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn currency_for_mapping(
        &self,
        conn: &mut SqliteConnection,
        mapping: Option<SourceIdentityMappingDB>,
    ) -> Result<Option<Currency>> {
        let Some(mapping) = mapping else {
            return Ok(None);
        };
        let currency_db = currencies::table
            .select(CurrencyDB::as_select())
            .find(&mapping.currency_id)
            .first::<CurrencyDB>(conn)
            .into_core()?;
        Ok(Some(currency_db.try_into()?))
    }
}

#[async_trait]
impl CurrencyRepositoryTrait for CurrencyRepository {
    async fn create(&self, new_currency: NewCurrency) -> Result<Currency> {
        new_currency.validate()?;

        let mut conn = get_connection(&self.pool)?;
        let mut currency_db: CurrencyDB = new_currency.into();
        if currency_db.id.is_empty() {
            currency_db.id = uuid::Uuid::new_v4().to_string();
        }

        diesel::insert_into(currencies::table)
            .values(&currency_db)
            .execute(&mut conn)
            .into_core()?;

        currency_db.try_into()
    }

    async fn add_mapping(
        &self,
        mapping: NewSourceIdentityMapping,
    ) -> Result<SourceIdentityMapping> {
        mapping.validate()?;

        let mut conn = get_connection(&self.pool)?;
        let mapping_db: SourceIdentityMappingDB = mapping.into();

        diesel::insert_into(source_identity_mappings::table)
            .values(&mapping_db)
            .execute(&mut conn)
            .into_core()?;

        Ok(mapping_db.into())
    }

    fn get_by_id(&self, currency_id: &str) -> Result<Currency> {
        let mut conn = get_connection(&self.pool)?;

        let currency_db = currencies::table
            .select(CurrencyDB::as_select())
            .find(currency_id)
            .first::<CurrencyDB>(&mut conn)
            .into_core()?;

        currency_db.try_into()
    }

    fn find_by_code(&self, code: &str) -> Result<Option<Currency>> {
        let mut conn = get_connection(&self.pool)?;

        // Codes are stored uppercase; uppercasing the lookup makes the
        // match case-insensitive.
        let currency_db = currencies::table
            .select(CurrencyDB::as_select())
            .filter(currencies::code.eq(code.to_uppercase()))
            .first::<CurrencyDB>(&mut conn)
            .optional()
            .into_core()?;

        currency_db.map(Currency::try_from).transpose()
    }

    fn find_by_contract(&self, network: &str, address: &str) -> Result<Option<Currency>> {
        let mut conn = get_connection(&self.pool)?;

        let mapping = source_identity_mappings::table
            .select(SourceIdentityMappingDB::as_select())
            .filter(source_identity_mappings::network.eq(network))
            .filter(source_identity_mappings::contract_address.eq(address.to_lowercase()))
            .first::<SourceIdentityMappingDB>(&mut conn)
            .optional()
            .into_core()?;

        self.currency_for_mapping(&mut conn, mapping)
    }

    fn find_native(&self, network: &str) -> Result<Option<Currency>> {
        let mut conn = get_connection(&self.pool)?;

        let mapping = source_identity_mappings::table
            .select(SourceIdentityMappingDB::as_select())
            .filter(source_identity_mappings::network.eq(network))
            .filter(source_identity_mappings::is_native.eq(true))
            .first::<SourceIdentityMappingDB>(&mut conn)
            .optional()
            .into_core()?;

        self.currency_for_mapping(&mut conn, mapping)
    }

    fn list(&self) -> Result<Vec<Currency>> {
        let mut conn = get_connection(&self.pool)?;

        let results = currencies::table
            .select(CurrencyDB::as_select())
            .order(currencies::code.asc())
            .load::<CurrencyDB>(&mut conn)
            .into_core()?;

        results.into_iter().map(Currency::try_from).collect()
    }

    fn list_mappings_for_source(&self, source: &str) -> Result<Vec<SourceIdentityMapping>> {
        let mut conn = get_connection(&self.pool)?;

        let results = source_identity_mappings::table
            .select(SourceIdentityMappingDB::as_select())
            .filter(source_identity_mappings::source.eq(source))
            .load::<SourceIdentityMappingDB>(&mut conn)
            .into_core()?;

        Ok(results
            .into_iter()
            .map(SourceIdentityMapping::from)
            .collect())
    }
}
