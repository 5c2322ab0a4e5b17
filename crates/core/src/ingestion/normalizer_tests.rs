//! Unit tests for balance normalization.

use super::*;
use crate::accounts::{Account, AccountRepositoryTrait, NewAccount};
use crate::currencies::{
    Currency, CurrencyKind, CurrencyRepositoryTrait, CurrencyResolver, NewCurrency,
    NewSourceIdentityMapping, SourceIdentityMapping, TokenMetadata,
};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
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

#[derive(Default)]
struct MockCurrencyRepository {
    currencies: RwLock<Vec<Currency>>,
    mappings: RwLock<Vec<SourceIdentityMapping>>,
}

impl MockCurrencyRepository {
    fn with_currency(self, id: &str, code: &str) -> Self {
        let now = Utc::now().naive_utc();
        self.currencies.write().unwrap().push(Currency {
            id: id.to_string(),
            code: code.to_string(),
            kind: CurrencyKind::Crypto,
            parent_currency_id: None,
            name: None,
            created_at: now,
            updated_at: now,
        });
        self
    }

    fn with_contract(self, currency_id: &str, network: &str, address: &str) -> Self {
        self.mappings.write().unwrap().push(SourceIdentityMapping {
            id: uuid::Uuid::new_v4().to_string(),
            currency_id: currency_id.to_string(),
            source: "onchain".to_string(),
            symbol: None,
            network: Some(network.to_string()),
            contract_address: Some(address.to_lowercase()),
            is_native: false,
            is_inverted: false,
            created_at: Utc::now().naive_utc(),
        });
        self
    }

    fn with_native(self, currency_id: &str, network: &str) -> Self {
        self.mappings.write().unwrap().push(SourceIdentityMapping {
            id: uuid::Uuid::new_v4().to_string(),
            currency_id: currency_id.to_string(),
            source: "onchain".to_string(),
            symbol: None,
            network: Some(network.to_string()),
            contract_address: None,
            is_native: true,
            is_inverted: false,
            created_at: Utc::now().naive_utc(),
        });
        self
    }
}

#[async_trait]
impl CurrencyRepositoryTrait for MockCurrencyRepository {
    async fn create(&self, new_currency: NewCurrency) -> Result<Currency> {
        let now = Utc::now().naive_utc();
        let currency = Currency {
            id: uuid::Uuid::new_v4().to_string(),
            code: new_currency.code.to_uppercase(),
            kind: new_currency.kind,
            parent_currency_id: new_currency.parent_currency_id,
            name: new_currency.name,
            created_at: now,
            updated_at: now,
        };
        self.currencies.write().unwrap().push(currency.clone());
        Ok(currency)
    }

    async fn add_mapping(
        &self,
        mapping: NewSourceIdentityMapping,
    ) -> Result<SourceIdentityMapping> {
        let stored = SourceIdentityMapping {
            id: uuid::Uuid::new_v4().to_string(),
            currency_id: mapping.currency_id,
            source: mapping.source,
            symbol: mapping.symbol,
            network: mapping.network,
            contract_address: mapping.contract_address.map(|a| a.to_lowercase()),
            is_native: mapping.is_native,
            is_inverted: mapping.is_inverted,
            created_at: Utc::now().naive_utc(),
        };
        self.mappings.write().unwrap().push(stored.clone());
        Ok(stored)
    }

    fn get_by_id(&self, currency_id: &str) -> Result<Currency> {
        self.currencies
            .read()
            .unwrap()
            .iter()
            .find(|c| c.id == currency_id)
            .cloned()
            .ok_or_else(|| Error::Repository(format!("Currency {} not found", currency_id)))
    }

    fn find_by_code(&self, code: &str) -> Result<Option<Currency>> {
        Ok(self
            .currencies
            .read()
            .unwrap()
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
            .cloned())
    }

    fn find_by_contract(&self, network: &str, address: &str) -> Result<Option<Currency>> {
        let currency_id = self.mappings.read().unwrap().iter().find_map(|m| {
            let matches = m.network.as_deref() == Some(network)
                && m.contract_address
                    .as_deref()
                    .is_some_and(|a| a.eq_ignore_ascii_case(address));
            matches.then(|| m.currency_id.clone())
        });
        match currency_id {
            Some(id) => self.get_by_id(&id).map(Some),
            None => Ok(None),
        }
    }

    fn find_native(&self, network: &str) -> Result<Option<Currency>> {
        let currency_id = self.mappings.read().unwrap().iter().find_map(|m| {
            (m.is_native && m.network.as_deref() == Some(network))
                .then(|| m.currency_id.clone())
        });
        match currency_id {
            Some(id) => self.get_by_id(&id).map(Some),
            None => Ok(None),
        }
    }

    fn list(&self) -> Result<Vec<Currency>> {
        Ok(self.currencies.read().unwrap().clone())
    }

    fn list_mappings_for_source(&self, source: &str) -> Result<Vec<SourceIdentityMapping>> {
        Ok(self
            .mappings
            .read()
            .unwrap()
            .iter()
            .filter(|m| m.source == source)
            .cloned()
            .collect())
    }
}

fn account(id: &str, name: &str, is_active: bool) -> Account {
    let now = Utc::now().naive_utc();
    Account {
        id: id.to_string(),
        name: name.to_string(),
        account_type: "EXCHANGE".to_string(),
        is_liability: false,
        is_active,
        created_at: now,
        updated_at: now,
    }
}

fn normalizer_with(
    accounts: Vec<Account>,
    currencies: MockCurrencyRepository,
) -> BalanceNormalizer {
    let resolver = CurrencyResolver::new(Arc::new(currencies));
    BalanceNormalizer::new(Arc::new(MockAccountRepository { accounts }), resolver)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn duplicate_observations_are_summed() {
    let normalizer = normalizer_with(
        vec![account("a1", "Binance", true)],
        MockCurrencyRepository::default().with_currency("btc", "BTC"),
    );

    let output = normalizer
        .normalize(vec![
            RawObservation::Exchange {
                account_id: "a1".to_string(),
                symbol: "BTC".to_string(),
                quantity: 0.5,
            },
            RawObservation::Exchange {
                account_id: "a1".to_string(),
                symbol: "btc".to_string(),
                quantity: 0.25,
            },
        ])
        .await
        .unwrap();

    assert_eq!(output.balances.len(), 1);
    let balance = &output.balances[0];
    assert_eq!(balance.account_id, "a1");
    assert_eq!(balance.currency_id, "btc");
    assert!((balance.quantity - 0.75).abs() < 1e-12);
    assert!(output.unmapped.is_empty());
}

#[tokio::test]
async fn merge_is_order_independent() {
    let repo = || {
        MockCurrencyRepository::default()
            .with_currency("btc", "BTC")
            .with_currency("eth", "ETH")
    };
    let obs = || {
        vec![
            RawObservation::Exchange {
                account_id: "a1".to_string(),
                symbol: "ETH".to_string(),
                quantity: 2.0,
            },
            RawObservation::Exchange {
                account_id: "a1".to_string(),
                symbol: "BTC".to_string(),
                quantity: 0.5,
            },
            RawObservation::Exchange {
                account_id: "a1".to_string(),
                symbol: "ETH".to_string(),
                quantity: 1.0,
            },
        ]
    };

    let forward = normalizer_with(vec![account("a1", "Binance", true)], repo())
        .normalize(obs())
        .await
        .unwrap();
    let mut reversed_input = obs();
    reversed_input.reverse();
    let reversed = normalizer_with(vec![account("a1", "Binance", true)], repo())
        .normalize(reversed_input)
        .await
        .unwrap();

    assert_eq!(forward.balances, reversed.balances);
}

#[tokio::test]
async fn unknown_ticker_is_excluded_with_reason() {
    let normalizer = normalizer_with(
        vec![account("a1", "Binance", true)],
        MockCurrencyRepository::default().with_currency("btc", "BTC"),
    );

    let output = normalizer
        .normalize(vec![
            RawObservation::Exchange {
                account_id: "a1".to_string(),
                symbol: "BTC".to_string(),
                quantity: 1.0,
            },
            RawObservation::Exchange {
                account_id: "a1".to_string(),
                symbol: "NOPE".to_string(),
                quantity: 3.0,
            },
        ])
        .await
        .unwrap();

    assert_eq!(output.balances.len(), 1);
    assert_eq!(output.unmapped.len(), 1);
    assert_eq!(output.unmapped[0].reason, UnmappedReason::UnknownCurrency);
    assert_eq!(output.unmapped[0].quantity, 3.0);
}

#[tokio::test]
async fn spreadsheet_rows_resolve_account_by_name() {
    let normalizer = normalizer_with(
        vec![
            account("a1", "BCA Checking", true),
            account("a2", "Closed Account", false),
        ],
        MockCurrencyRepository::default().with_currency("idr", "IDR"),
    );

    let output = normalizer
        .normalize(vec![
            RawObservation::Spreadsheet {
                account_name: "BCA Checking".to_string(),
                currency_code: "IDR".to_string(),
                quantity: 1_500_000.0,
            },
            // Inactive accounts are not resolvable targets.
            RawObservation::Spreadsheet {
                account_name: "Closed Account".to_string(),
                currency_code: "IDR".to_string(),
                quantity: 10.0,
            },
            RawObservation::Spreadsheet {
                account_name: "Who Dis".to_string(),
                currency_code: "IDR".to_string(),
                quantity: 5.0,
            },
        ])
        .await
        .unwrap();

    assert_eq!(output.balances.len(), 1);
    assert_eq!(output.balances[0].account_id, "a1");
    assert_eq!(output.unmapped.len(), 2);
    assert!(output
        .unmapped
        .iter()
        .all(|r| r.reason == UnmappedReason::UnknownAccount));
}

#[tokio::test]
async fn duplicate_spreadsheet_rows_are_summed() {
    let normalizer = normalizer_with(
        vec![account("a1", "Cash", true)],
        MockCurrencyRepository::default().with_currency("usd", "USD"),
    );

    let output = normalizer
        .normalize(vec![
            RawObservation::Spreadsheet {
                account_name: "Cash".to_string(),
                currency_code: "USD".to_string(),
                quantity: 100.0,
            },
            RawObservation::Spreadsheet {
                account_name: "Cash".to_string(),
                currency_code: "USD".to_string(),
                quantity: 50.0,
            },
        ])
        .await
        .unwrap();

    assert_eq!(output.balances.len(), 1);
    assert!((output.balances[0].quantity - 150.0).abs() < 1e-12);
}

#[tokio::test]
async fn wallet_contract_resolves_and_discovers() {
    let currencies = MockCurrencyRepository::default()
        .with_currency("eth", "ETH")
        .with_native("eth", "ethereum");
    let normalizer = normalizer_with(vec![account("a1", "Main Wallet", true)], currencies);

    let output = normalizer
        .normalize(vec![
            RawObservation::Wallet {
                account_id: "a1".to_string(),
                network: "ethereum".to_string(),
                contract_address: None,
                metadata: None,
                quantity: 1.5,
            },
            // Unknown contract with metadata auto-creates a currency.
            RawObservation::Wallet {
                account_id: "a1".to_string(),
                network: "ethereum".to_string(),
                contract_address: Some(
                    "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".to_string(),
                ),
                metadata: Some(TokenMetadata {
                    symbol: "USDC".to_string(),
                    name: Some("USD Coin".to_string()),
                    decimals: 6,
                }),
                quantity: 250.0,
            },
            // Unknown contract without metadata stays unmapped.
            RawObservation::Wallet {
                account_id: "a1".to_string(),
                network: "ethereum".to_string(),
                contract_address: Some(
                    "0x0000000000000000000000000000000000000002".to_string(),
                ),
                metadata: None,
                quantity: 42.0,
            },
        ])
        .await
        .unwrap();

    assert_eq!(output.balances.len(), 2);
    assert_eq!(output.unmapped.len(), 1);
    assert_eq!(output.unmapped[0].reason, UnmappedReason::UnknownContract);
}
