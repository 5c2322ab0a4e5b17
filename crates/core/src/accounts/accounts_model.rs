//! Account domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Well-known account type labels.
pub mod account_types {
    pub const BANK: &str = "BANK";
    pub const EXCHANGE: &str = "EXCHANGE";
    pub const WALLET: &str = "WALLET";
    pub const CASH: &str = "CASH";
    pub const LOAN: &str = "LOAN";
}

/// Domain model representing an owned holding location.
///
/// Accounts are created at bootstrap and never hard-deleted; deactivation
/// preserves referential integrity of historical snapshot rows.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_type: String,
    /// Liability-like accounts subtract from net worth.
    pub is_liability: bool,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub account_type: String,
    pub is_liability: bool,
    pub is_active: bool,
}

impl NewAccount {
    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        if self.account_type.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account type cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}
