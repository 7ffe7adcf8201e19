use async_trait::async_trait;

use crate::error::BackendError;
use crate::ids::AccountId;
use crate::types::Account;

#[async_trait]
pub trait Accounts: Send + Sync {
    /// # Errors
    ///
    /// Returns [`BackendError::AlreadyExists`] if an account with the same
    /// email is already registered.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, BackendError>;

    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the account does not exist.
    async fn delete_account(&self, id: &AccountId) -> Result<(), BackendError>;
}
