//! Wires repositories and services onto a database pool.

use std::collections::HashMap;
use std::sync::Arc;

use networth_core::accounts::AccountRepositoryTrait;
use networth_core::currencies::{CurrencyRepositoryTrait, ONCHAIN_SOURCE};
use networth_core::ingestion::{IngestionService, SourceCollector};
use networth_core::net_worth::{NetWorthRepositoryTrait, NetWorthService};
use networth_core::rates::{RateRefreshService, RateRepositoryTrait};
use networth_core::snapshots::SnapshotRepositoryTrait;
use networth_core::Result;
use networth_market_data::QuoteProvider;
use networth_storage_sqlite as storage;

use crate::collectors::{EvmWalletCollector, SpreadsheetCollector, WalletsConfig};
use crate::config::Config;

/// The application's repository graph, backed by one SQLite pool.
pub struct AppContext {
    pub accounts: Arc<dyn AccountRepositoryTrait>,
    pub currencies: Arc<dyn CurrencyRepositoryTrait>,
    pub rates: Arc<dyn RateRepositoryTrait>,
    pub snapshots: Arc<dyn SnapshotRepositoryTrait>,
    pub net_worth: Arc<dyn NetWorthRepositoryTrait>,
}

impl AppContext {
    /// Opens (and migrates) the database and builds every repository.
    pub fn build(config: &Config) -> Result<Self> {
        let pool = storage::init(&config.db_path)?;
        Ok(Self {
            accounts: Arc::new(storage::accounts::AccountRepository::new(pool.clone())),
            currencies: Arc::new(storage::currencies::CurrencyRepository::new(pool.clone())),
            rates: Arc::new(storage::rates::RateRepository::new(pool.clone())),
            snapshots: Arc::new(storage::snapshots::SnapshotRepository::new(pool.clone())),
            net_worth: Arc::new(storage::net_worth::NetWorthRepository::new(pool)),
        })
    }

    pub fn ingestion_service(&self, config: &Config) -> IngestionService {
        IngestionService::new(
            self.accounts.clone(),
            self.currencies.clone(),
            self.rates.clone(),
            self.snapshots.clone(),
            config.secondary_currency.clone(),
        )
    }

    pub fn rate_refresh_service(
        &self,
        providers: Vec<Arc<dyn QuoteProvider>>,
    ) -> RateRefreshService {
        RateRefreshService::new(self.currencies.clone(), self.rates.clone(), providers)
    }

    pub fn net_worth_service(&self) -> NetWorthService {
        NetWorthService::new(
            self.accounts.clone(),
            self.snapshots.clone(),
            self.net_worth.clone(),
        )
    }

    /// Builds the configured source collectors.
    ///
    /// Sources without configuration are simply absent, mirroring how
    /// missing exchange credentials skip that exchange: the selection
    /// decides what is *allowed* to run, the configuration decides what
    /// *can*.
    pub fn build_collectors(&self, config: &Config) -> Result<Vec<Arc<dyn SourceCollector>>> {
        let mut collectors: Vec<Arc<dyn SourceCollector>> = Vec::new();

        if let Some(path) = &config.spreadsheet_path {
            collectors.push(Arc::new(SpreadsheetCollector::new(path.clone())));
        }

        if let Some(path) = &config.wallets_config_path {
            let wallets_config = WalletsConfig::load(path)?;

            let account_ids: HashMap<String, String> = self
                .accounts
                .list(Some(true))?
                .into_iter()
                .map(|a| (a.name, a.id))
                .collect();

            let mut known_contracts: HashMap<String, Vec<String>> = HashMap::new();
            for mapping in self.currencies.list_mappings_for_source(ONCHAIN_SOURCE)? {
                let (Some(network), Some(contract)) = (mapping.network, mapping.contract_address)
                else {
                    continue;
                };
                known_contracts.entry(network).or_default().push(contract);
            }

            collectors.push(Arc::new(EvmWalletCollector::new(
                wallets_config,
                account_ids,
                known_contracts,
            )));
        }

        Ok(collectors)
    }
}
