//! Environment-driven configuration for the batch entrypoints.
//!
//! Command-line flags override these values where a flag exists.

use std::path::PathBuf;

/// Runtime configuration read from the environment (with `.env` support
/// via dotenvy at startup).
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file.
    pub db_path: String,
    /// Directory for the per-command lock files.
    pub lock_dir: PathBuf,
    /// Currency every balance is valued in.
    pub base_currency: String,
    /// Secondary display currency.
    pub secondary_currency: String,
    /// CSV spreadsheet with manually maintained balances, if any.
    pub spreadsheet_path: Option<PathBuf>,
    /// TOML file describing networks, wallets, and known contracts.
    pub wallets_config_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let db_path =
            std::env::var("NETWORTH_DB_PATH").unwrap_or_else(|_| "data/networth.db".to_string());
        let lock_dir = std::env::var("NETWORTH_LOCK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                PathBuf::from(&db_path)
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| PathBuf::from("."))
            });

        Self {
            db_path,
            lock_dir,
            base_currency: std::env::var("NETWORTH_BASE_CURRENCY")
                .unwrap_or_else(|_| networth_core::constants::DEFAULT_BASE_CURRENCY.to_string()),
            secondary_currency: std::env::var("NETWORTH_SECONDARY_CURRENCY").unwrap_or_else(
                |_| networth_core::constants::DEFAULT_SECONDARY_CURRENCY.to_string(),
            ),
            spreadsheet_path: std::env::var("NETWORTH_SPREADSHEET_PATH")
                .ok()
                .map(PathBuf::from),
            wallets_config_path: std::env::var("NETWORTH_WALLETS_CONFIG")
                .ok()
                .map(PathBuf::from),
        }
    }
}
