//! Database models for currencies and source identity mappings.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use networth_core::currencies::{
    Currency, CurrencyKind, NewCurrency, NewSourceIdentityMapping, SourceIdentityMapping,
};
use networth_core::errors::Error;

/// Database model for currencies
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::currencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CurrencyDB {
    pub id: String,
    pub code: String,
    pub currency_type: String,
    pub parent_currency_id: Option<String>,
    pub name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// An unknown stored `currency_type` surfaces as a fatal configuration
/// error, which makes this conversion fallible.
impl TryFrom<CurrencyDB> for Currency {
    type Error = Error;

    fn try_from(db: CurrencyDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            code: db.code,
            kind: CurrencyKind::parse(&db.currency_type)?,
            parent_currency_id: db.parent_currency_id,
            name: db.name,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<NewCurrency> for CurrencyDB {
    fn from(domain: NewCurrency) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_default(),
            code: domain.code.to_uppercase(),
            currency_type: domain.kind.as_str().to_string(),
            parent_currency_id: domain.parent_currency_id,
            name: domain.name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Database model for source identity mappings
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::source_identity_mappings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SourceIdentityMappingDB {
    pub id: String,
    pub currency_id: String,
    pub source: String,
    pub symbol: Option<String>,
    pub network: Option<String>,
    pub contract_address: Option<String>,
    pub is_native: bool,
    pub is_inverted: bool,
    pub created_at: NaiveDateTime,
}

impl From<SourceIdentityMappingDB> for SourceIdentityMapping {
    fn from(db: SourceIdentityMappingDB) -> Self {
        Self {
            id: db.id,
            currency_id: db.currency_id,
            source: db.source,
            symbol: db.symbol,
            network: db.network,
            contract_address: db.contract_address,
            is_native: db.is_native,
            is_inverted: db.is_inverted,
            created_at: db.created_at,
        }
    }
}

impl From<NewSourceIdentityMapping> for SourceIdentityMappingDB {
    fn from(domain: NewSourceIdentityMapping) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            currency_id: domain.currency_id,
            source: domain.source,
            symbol: domain.symbol,
            network: domain.network,
            // Contract addresses are compared case-insensitively; store
            // the canonical lowercase form.
            contract_address: domain.contract_address.map(|a| a.to_lowercase()),
            is_native: domain.is_native,
            is_inverted: domain.is_inverted,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
