use async_trait::async_trait;

use crate::error::BackendError;
use crate::ids::TeamId;
use crate::types::Team;

#[async_trait]
pub trait Teams: Send + Sync {
    /// Create a team. When `id` is given, the team is created under that
    /// id (restoring a previously deleted team, for instance).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::AlreadyExists`] if an explicit `id` is
    /// already taken.
    async fn create_team(&self, id: Option<TeamId>, name: &str) -> Result<Team, BackendError>;

    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the team does not exist.
    async fn get_team(&self, id: &TeamId) -> Result<Team, BackendError>;

    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the team does not exist.
    async fn delete_team(&self, id: &TeamId) -> Result<(), BackendError>;
}
