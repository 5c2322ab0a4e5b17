//! Shared fixtures for storage integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use networth_core::accounts::{AccountRepositoryTrait, NewAccount};
use networth_core::currencies::{CurrencyKind, CurrencyRepositoryTrait, NewCurrency};
use networth_storage_sqlite::accounts::AccountRepository;
use networth_storage_sqlite::currencies::CurrencyRepository;
use networth_storage_sqlite::{init, DbPool};

/// Creates a fresh migrated database in a temp directory.
/// The TempDir must stay alive for the duration of the test.
pub fn test_pool() -> (tempfile::TempDir, Arc<DbPool>) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db_path = dir.path().join("test.db");
    let pool = init(db_path.to_str().unwrap()).expect("init test database");
    (dir, pool)
}

pub async fn seed_account(pool: &Arc<DbPool>, name: &str) -> String {
    let repository = AccountRepository::new(pool.clone());
    let account = repository
        .create(NewAccount {
            id: None,
            name: name.to_string(),
            account_type: "EXCHANGE".to_string(),
            is_liability: false,
            is_active: true,
        })
        .await
        .expect("seed account");
    account.id
}

pub async fn seed_currency(pool: &Arc<DbPool>, code: &str) -> String {
    let repository = CurrencyRepository::new(pool.clone());
    let currency = repository
        .create(NewCurrency {
            id: None,
            code: code.to_string(),
            kind: CurrencyKind::Crypto,
            parent_currency_id: None,
            name: None,
        })
        .await
        .expect("seed currency");
    currency.id
}
