use async_trait::async_trait;

use crate::error::BackendError;
use crate::ids::SessionId;
use crate::types::Session;

#[async_trait]
pub trait Sessions: Send + Sync {
    /// # Errors
    ///
    /// Returns [`BackendError::Unauthorized`] if the credentials do not
    /// match a registered account.
    async fn create_session(&self, email: &str, password: &str)
    -> Result<Session, BackendError>;

    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the session does not exist.
    async fn delete_session(&self, id: &SessionId) -> Result<(), BackendError>;
}
