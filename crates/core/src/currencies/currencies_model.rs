//! Currency domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Closed classification taxonomy for canonical currencies.
///
/// Persisted as lowercase text. An unknown stored value is a fatal
/// configuration error, not a recoverable per-record condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyKind {
    Fiat,
    #[default]
    Crypto,
    Stablecoin,
    Stock,
    Metal,
}

impl CurrencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyKind::Fiat => "fiat",
            CurrencyKind::Crypto => "crypto",
            CurrencyKind::Stablecoin => "stablecoin",
            CurrencyKind::Stock => "stock",
            CurrencyKind::Metal => "metal",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "fiat" => Ok(CurrencyKind::Fiat),
            "crypto" => Ok(CurrencyKind::Crypto),
            "stablecoin" => Ok(CurrencyKind::Stablecoin),
            "stock" => Ok(CurrencyKind::Stock),
            "metal" => Ok(CurrencyKind::Metal),
            other => Err(Error::Configuration(format!(
                "Unknown currency type '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for CurrencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain model representing a canonical currency.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: String,
    /// Uppercase ticker, unique across the registry.
    pub code: String,
    pub kind: CurrencyKind,
    /// Derivative/wrapped tokens track their parent's market value 1:1.
    pub parent_currency_id: Option<String>,
    pub name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Currency {
    /// A parent reference pointing back at the currency itself is
    /// degenerate and treated as no parent.
    pub fn effective_parent_id(&self) -> Option<&str> {
        self.parent_currency_id
            .as_deref()
            .filter(|parent| *parent != self.id)
    }
}

/// Input model for creating a new canonical currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCurrency {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub code: String,
    pub kind: CurrencyKind,
    pub parent_currency_id: Option<String>,
    pub name: Option<String>,
}

impl NewCurrency {
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Currency code cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}

/// A resolvable key by which a raw source reports a currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawCurrencyIdentity {
    /// Free-text ticker, matched case-insensitively.
    Symbol(String),
    /// Token contract on a network; addresses compare case-insensitively.
    Contract { network: String, address: String },
    /// The network's native asset (no contract address).
    Native { network: String },
}

impl std::fmt::Display for RawCurrencyIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawCurrencyIdentity::Symbol(symbol) => write!(f, "symbol '{symbol}'"),
            RawCurrencyIdentity::Contract { network, address } => {
                write!(f, "contract {address} on {network}")
            }
            RawCurrencyIdentity::Native { network } => write!(f, "native asset of {network}"),
        }
    }
}

/// Token metadata supplied by a collector for auto-discovery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub symbol: String,
    pub name: Option<String>,
    pub decimals: u8,
}

/// One source-specific identity mapped onto a canonical currency.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourceIdentityMapping {
    pub id: String,
    pub currency_id: String,
    /// Source name, e.g. a quote provider or `onchain`.
    pub source: String,
    pub symbol: Option<String>,
    pub network: Option<String>,
    /// Stored lowercase; at most one canonical currency per
    /// (network, contract_address).
    pub contract_address: Option<String>,
    pub is_native: bool,
    /// The provider quotes the pair the other way round; invert at fetch.
    pub is_inverted: bool,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a new identity mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSourceIdentityMapping {
    pub currency_id: String,
    pub source: String,
    pub symbol: Option<String>,
    pub network: Option<String>,
    pub contract_address: Option<String>,
    pub is_native: bool,
    pub is_inverted: bool,
}

impl NewSourceIdentityMapping {
    pub fn validate(&self) -> Result<()> {
        if self.symbol.is_none() && self.contract_address.is_none() && !self.is_native {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Identity mapping needs a symbol, a contract address, or the native marker"
                    .to_string(),
            )));
        }
        Ok(())
    }
}

/// Source name recorded for on-chain contract mappings.
pub const ONCHAIN_SOURCE: &str = "onchain";
