//! Account repository trait.
//!
//! Defines the contract for account persistence without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::accounts_model::{Account, NewAccount};
use crate::errors::Result;

/// Trait defining the contract for Account repository operations.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Creates a new account.
    async fn create(&self, new_account: NewAccount) -> Result<Account>;

    /// Activates or deactivates an account. Accounts are never deleted.
    async fn set_active(&self, account_id: &str, active: bool) -> Result<Account>;

    /// Retrieves an account by its ID.
    fn get_by_id(&self, account_id: &str) -> Result<Account>;

    /// Looks up an account by its display name (exact match).
    fn find_by_name(&self, name: &str) -> Result<Option<Account>>;

    /// Lists accounts, optionally filtered by active status.
    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<Account>>;
}
