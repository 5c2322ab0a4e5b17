//! End-to-end pipeline tests over mock repositories and collectors.

use super::*;
use crate::accounts::{Account, AccountRepositoryTrait, NewAccount};
use crate::currencies::{
    Currency, CurrencyKind, CurrencyRepositoryTrait, NewCurrency, NewSourceIdentityMapping,
    SourceIdentityMapping,
};
use crate::errors::{Error, Result};
use crate::rates::{NewRate, RateRecord, RateRepositoryTrait};
use crate::snapshots::{
    BalanceSnapshotRow, HoldingKey, NewBalanceRow, SnapshotRepositoryTrait,
};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::sync::{Arc, RwLock};

// ============================================================================
// Mock Implementations
// ============================================================================

struct MockAccountRepository {
    accounts: Vec<Account>,
}

#[async_trait]
impl AccountRepositoryTrait for MockAccountRepository {
    async fn create(&self, _new_account: NewAccount) -> Result<Account> {
        unimplemented!()
    }

    async fn set_active(&self, _account_id: &str, _active: bool) -> Result<Account> {
        unimplemented!()
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        self.accounts
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| Error::Repository(format!("Account {} not found", account_id)))
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Account>> {
        Ok(self.accounts.iter().find(|a| a.name == name).cloned())
    }

    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<Account>> {
        Ok(self
            .accounts
            .iter()
            .filter(|a| is_active_filter.is_none_or(|active| a.is_active == active))
            .cloned()
            .collect())
    }
}

struct MockCurrencyRepository {
    currencies: Vec<Currency>,
}

#[async_trait]
impl CurrencyRepositoryTrait for MockCurrencyRepository {
    async fn create(&self, _new_currency: NewCurrency) -> Result<Currency> {
        unimplemented!()
    }

    async fn add_mapping(
        &self,
        _mapping: NewSourceIdentityMapping,
    ) -> Result<SourceIdentityMapping> {
        unimplemented!()
    }

    fn get_by_id(&self, currency_id: &str) -> Result<Currency> {
        self.currencies
            .iter()
            .find(|c| c.id == currency_id)
            .cloned()
            .ok_or_else(|| Error::Repository(format!("Currency {} not found", currency_id)))
    }

    fn find_by_code(&self, code: &str) -> Result<Option<Currency>> {
        Ok(self
            .currencies
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
            .cloned())
    }

    fn find_by_contract(&self, _network: &str, _address: &str) -> Result<Option<Currency>> {
        Ok(None)
    }

    fn find_native(&self, _network: &str) -> Result<Option<Currency>> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<Currency>> {
        Ok(self.currencies.clone())
    }

    fn list_mappings_for_source(&self, _source: &str) -> Result<Vec<SourceIdentityMapping>> {
        Ok(Vec::new())
    }
}

struct MockRateRepository {
    rates: Vec<RateRecord>,
}

#[async_trait]
impl RateRepositoryTrait for MockRateRepository {
    async fn upsert(&self, _rate: NewRate) -> Result<RateRecord> {
        unimplemented!()
    }

    fn get_for_currency(&self, currency_id: &str) -> Result<Option<RateRecord>> {
        Ok(self
            .rates
            .iter()
            .find(|r| r.currency_id == currency_id)
            .cloned())
    }

    fn get_all(&self) -> Result<Vec<RateRecord>> {
        Ok(self.rates.clone())
    }
}

/// Records inserted snapshots for assertions.
#[derive(Default)]
struct MockSnapshotRepository {
    nonzero_holdings: Vec<HoldingKey>,
    inserted: RwLock<Vec<(NaiveDateTime, Vec<NewBalanceRow>)>>,
}

#[async_trait]
impl SnapshotRepositoryTrait for MockSnapshotRepository {
    async fn insert_snapshot(
        &self,
        timestamp: NaiveDateTime,
        rows: Vec<NewBalanceRow>,
    ) -> Result<usize> {
        let count = rows.len();
        self.inserted.write().unwrap().push((timestamp, rows));
        Ok(count)
    }

    fn latest_nonzero_holdings(&self) -> Result<Vec<HoldingKey>> {
        Ok(self.nonzero_holdings.clone())
    }

    fn latest_balances(&self) -> Result<Vec<BalanceSnapshotRow>> {
        unimplemented!()
    }
}

/// Collector returning a fixed batch, or failing on demand.
struct MockCollector {
    kind: SourceKind,
    name: String,
    observations: Vec<RawObservation>,
    fail: bool,
}

#[async_trait]
impl SourceCollector for MockCollector {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(&self) -> Result<Vec<RawObservation>> {
        if self.fail {
            return Err(Error::Unexpected("connection refused".to_string()));
        }
        Ok(self.observations.clone())
    }
}

fn account(id: &str, name: &str) -> Account {
    let now = Utc::now().naive_utc();
    Account {
        id: id.to_string(),
        name: name.to_string(),
        account_type: "EXCHANGE".to_string(),
        is_liability: false,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn currency(id: &str, code: &str) -> Currency {
    let now = Utc::now().naive_utc();
    Currency {
        id: id.to_string(),
        code: code.to_string(),
        kind: CurrencyKind::Crypto,
        parent_currency_id: None,
        name: None,
        created_at: now,
        updated_at: now,
    }
}

fn rate(currency_id: &str, value: f64) -> RateRecord {
    RateRecord {
        currency_id: currency_id.to_string(),
        rate: value,
        source: "test".to_string(),
        updated_at: Utc::now().naive_utc(),
    }
}

fn run_timestamp() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn service(
    accounts: Vec<Account>,
    currencies: Vec<Currency>,
    rates: Vec<RateRecord>,
    snapshots: Arc<MockSnapshotRepository>,
) -> IngestionService {
    IngestionService::new(
        Arc::new(MockAccountRepository { accounts }),
        Arc::new(MockCurrencyRepository { currencies }),
        Arc::new(MockRateRepository { rates }),
        snapshots,
        "IDR".to_string(),
    )
}

fn exchange_collector(observations: Vec<RawObservation>) -> Arc<dyn SourceCollector> {
    Arc::new(MockCollector {
        kind: SourceKind::Exchanges,
        name: "Binance".to_string(),
        observations,
        fail: false,
    })
}

fn btc_observation(quantity: f64) -> RawObservation {
    RawObservation::Exchange {
        account_id: "ax".to_string(),
        symbol: "BTC".to_string(),
        quantity,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn full_pipeline_values_and_commits() {
    let snapshots = Arc::new(MockSnapshotRepository::default());
    let service = service(
        vec![account("ax", "AccountX")],
        vec![
            currency("btc", "BTC"),
            currency("usd", "USD"),
            currency("idr", "IDR"),
        ],
        vec![
            rate("btc", 65000.0),
            rate("usd", 1.0),
            rate("idr", 1.0 / 15800.0),
        ],
        snapshots.clone(),
    );

    let summary = service
        .run(
            &[exchange_collector(vec![btc_observation(0.1)])],
            &SourceSelection::All,
            run_timestamp(),
        )
        .await
        .unwrap();

    assert_eq!(summary.collected, 1);
    assert_eq!(summary.normalized, 1);
    assert_eq!(summary.inserted, 1);
    assert!(summary.unmapped.is_empty());
    assert!(summary.unvaluable.is_empty());

    let inserted = snapshots.inserted.read().unwrap();
    let (_, rows) = &inserted[0];
    assert_eq!(rows.len(), 1);
    assert!((rows[0].value_base - 6500.0).abs() < 1e-9);
    let secondary = rows[0].value_secondary.expect("IDR cross-rate configured");
    assert!((secondary - 102_700_000.0).abs() < 1e-3);
}

#[tokio::test]
async fn partial_run_skips_reconciliation() {
    let snapshots = Arc::new(MockSnapshotRepository {
        nonzero_holdings: vec![HoldingKey {
            account_id: "ax".to_string(),
            currency_id: "eth".to_string(),
        }],
        ..Default::default()
    });
    let service = service(
        vec![account("ax", "AccountX")],
        vec![currency("btc", "BTC"), currency("eth", "ETH")],
        vec![rate("btc", 65000.0), rate("eth", 3200.0)],
        snapshots.clone(),
    );

    let summary = service
        .run(
            &[exchange_collector(vec![btc_observation(0.1)])],
            &SourceSelection::Only(vec![SourceKind::Exchanges]),
            run_timestamp(),
        )
        .await
        .unwrap();

    assert_eq!(summary.zeroed, 0);
    let inserted = snapshots.inserted.read().unwrap();
    let (_, rows) = &inserted[0];
    assert!(!rows.iter().any(|r| r.currency_id == "eth"));
}

#[tokio::test]
async fn full_run_zeroes_disappeared_holdings() {
    let snapshots = Arc::new(MockSnapshotRepository {
        nonzero_holdings: vec![HoldingKey {
            account_id: "ax".to_string(),
            currency_id: "eth".to_string(),
        }],
        ..Default::default()
    });
    let service = service(
        vec![account("ax", "AccountX")],
        vec![currency("btc", "BTC"), currency("eth", "ETH")],
        vec![rate("btc", 65000.0), rate("eth", 3200.0)],
        snapshots.clone(),
    );

    let summary = service
        .run(
            &[exchange_collector(vec![btc_observation(0.1)])],
            &SourceSelection::All,
            run_timestamp(),
        )
        .await
        .unwrap();

    assert_eq!(summary.zeroed, 1);
    assert_eq!(summary.inserted, 2);
    let inserted = snapshots.inserted.read().unwrap();
    let (_, rows) = &inserted[0];
    let zero_row = rows.iter().find(|r| r.currency_id == "eth").unwrap();
    assert_eq!(zero_row.quantity, 0.0);
    assert_eq!(zero_row.value_base, 0.0);
    assert_eq!(zero_row.value_secondary, Some(0.0));
}

#[tokio::test]
async fn unvaluable_balance_is_reported_not_committed() {
    let snapshots = Arc::new(MockSnapshotRepository::default());
    let service = service(
        vec![account("ax", "AccountX")],
        vec![currency("btc", "BTC"), currency("newcoin", "NEWCOIN")],
        vec![rate("btc", 65000.0)],
        snapshots.clone(),
    );

    let summary = service
        .run(
            &[exchange_collector(vec![
                btc_observation(0.1),
                RawObservation::Exchange {
                    account_id: "ax".to_string(),
                    symbol: "NEWCOIN".to_string(),
                    quantity: 99.0,
                },
            ])],
            &SourceSelection::All,
            run_timestamp(),
        )
        .await
        .unwrap();

    assert_eq!(summary.normalized, 2);
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.unvaluable.len(), 1);
    assert_eq!(summary.unvaluable[0].currency_code, "NEWCOIN");

    let inserted = snapshots.inserted.read().unwrap();
    let (_, rows) = &inserted[0];
    assert!(!rows.iter().any(|r| r.currency_id == "newcoin"));
}

#[tokio::test]
async fn failed_source_is_recovered_and_reported() {
    let snapshots = Arc::new(MockSnapshotRepository::default());
    let service = service(
        vec![account("ax", "AccountX")],
        vec![currency("btc", "BTC")],
        vec![rate("btc", 65000.0)],
        snapshots.clone(),
    );

    let collectors: Vec<Arc<dyn SourceCollector>> = vec![
        Arc::new(MockCollector {
            kind: SourceKind::Exchanges,
            name: "OKX".to_string(),
            observations: Vec::new(),
            fail: true,
        }),
        exchange_collector(vec![btc_observation(0.5)]),
    ];

    let summary = service
        .run(&collectors, &SourceSelection::All, run_timestamp())
        .await
        .unwrap();

    assert_eq!(summary.source_failures.len(), 1);
    assert_eq!(summary.source_failures[0].name, "OKX");
    assert_eq!(summary.inserted, 1);
}

#[tokio::test]
async fn empty_run_is_a_noop() {
    let snapshots = Arc::new(MockSnapshotRepository::default());
    let service = service(
        vec![account("ax", "AccountX")],
        vec![currency("btc", "BTC")],
        vec![rate("btc", 65000.0)],
        snapshots.clone(),
    );

    let summary = service
        .run(
            &[exchange_collector(Vec::new())],
            &SourceSelection::All,
            run_timestamp(),
        )
        .await
        .unwrap();

    assert!(summary.is_noop());
    assert!(snapshots.inserted.read().unwrap().is_empty());
}

#[tokio::test]
async fn selection_filters_collectors() {
    let snapshots = Arc::new(MockSnapshotRepository::default());
    let service = service(
        vec![account("ax", "AccountX")],
        vec![currency("btc", "BTC")],
        vec![rate("btc", 65000.0)],
        snapshots.clone(),
    );

    let collectors: Vec<Arc<dyn SourceCollector>> = vec![
        exchange_collector(vec![btc_observation(1.0)]),
        Arc::new(MockCollector {
            kind: SourceKind::Spreadsheet,
            name: "Sheet".to_string(),
            observations: vec![RawObservation::Spreadsheet {
                account_name: "AccountX".to_string(),
                currency_code: "BTC".to_string(),
                quantity: 2.0,
            }],
            fail: false,
        }),
    ];

    let summary = service
        .run(
            &collectors,
            &SourceSelection::Only(vec![SourceKind::Spreadsheet]),
            run_timestamp(),
        )
        .await
        .unwrap();

    assert_eq!(summary.collected, 1);
    let inserted = snapshots.inserted.read().unwrap();
    let (_, rows) = &inserted[0];
    assert_eq!(rows[0].quantity, 2.0);
}
