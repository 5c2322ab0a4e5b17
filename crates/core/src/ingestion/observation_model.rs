//! In-pipeline balance records.
//!
//! Raw observations exist only within one ingestion run; nothing here is
//! persisted individually.

use serde::{Deserialize, Serialize};

use crate::currencies::TokenMetadata;
use crate::errors::{Error, ValidationError};

/// The kinds of source collector an ingestion run can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Exchanges,
    Wallets,
    Spreadsheet,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Exchanges => "exchanges",
            SourceKind::Wallets => "wallets",
            SourceKind::Spreadsheet => "spreadsheet",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "exchanges" => Ok(SourceKind::Exchanges),
            "wallets" => Ok(SourceKind::Wallets),
            "spreadsheet" => Ok(SourceKind::Spreadsheet),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown source kind '{other}'"
            )))),
        }
    }
}

/// Which sources an ingestion run draws from.
///
/// Reconciliation of disappeared holdings is only sound when every
/// configured source contributed; a partial selection must skip it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    All,
    Only(Vec<SourceKind>),
}

impl SourceSelection {
    pub fn includes(&self, kind: SourceKind) -> bool {
        match self {
            SourceSelection::All => true,
            SourceSelection::Only(kinds) => kinds.contains(&kind),
        }
    }

    /// True when the run aggregates every configured source.
    pub fn is_full(&self) -> bool {
        matches!(self, SourceSelection::All)
    }
}

impl std::fmt::Display for SourceSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceSelection::All => f.write_str("all"),
            SourceSelection::Only(kinds) => {
                let names: Vec<&str> = kinds.iter().map(SourceKind::as_str).collect();
                f.write_str(&names.join(","))
            }
        }
    }
}

/// One raw balance observation as reported by a source collector.
///
/// A tagged union over the known source kinds, each carrying just the
/// identity fields its source can supply.
#[derive(Debug, Clone, PartialEq)]
pub enum RawObservation {
    /// An exchange sub-account balance, identified by ticker symbol.
    Exchange {
        account_id: String,
        symbol: String,
        quantity: f64,
    },
    /// An on-chain wallet balance: a token contract or, when
    /// `contract_address` is `None`, the network's native asset.
    /// Metadata, when the collector fetched it, enables auto-discovery.
    Wallet {
        account_id: String,
        network: String,
        contract_address: Option<String>,
        metadata: Option<TokenMetadata>,
        quantity: f64,
    },
    /// A manually maintained spreadsheet row, identified by account
    /// display name and currency code.
    Spreadsheet {
        account_name: String,
        currency_code: String,
        quantity: f64,
    },
}

impl RawObservation {
    pub fn quantity(&self) -> f64 {
        match self {
            RawObservation::Exchange { quantity, .. }
            | RawObservation::Wallet { quantity, .. }
            | RawObservation::Spreadsheet { quantity, .. } => *quantity,
        }
    }

    pub fn source_kind(&self) -> SourceKind {
        match self {
            RawObservation::Exchange { .. } => SourceKind::Exchanges,
            RawObservation::Wallet { .. } => SourceKind::Wallets,
            RawObservation::Spreadsheet { .. } => SourceKind::Spreadsheet,
        }
    }
}

/// One record per distinct (account, canonical currency) pair after the
/// normalizer's summation merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBalance {
    pub account_id: String,
    pub currency_id: String,
    pub quantity: f64,
}

/// A normalized balance with its valuation attached.
///
/// `value_base` is `None` when no rate exists for the currency; such
/// records stay visible through the pipeline but are excluded from the
/// committed snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuedBalance {
    pub account_id: String,
    pub currency_id: String,
    pub quantity: f64,
    pub value_base: Option<f64>,
    pub value_secondary: Option<f64>,
}

impl ValuedBalance {
    pub fn is_valuable(&self) -> bool {
        self.value_base.is_some()
    }
}
