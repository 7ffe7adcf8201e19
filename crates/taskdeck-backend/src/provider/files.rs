use async_trait::async_trait;

use crate::error::BackendError;
use crate::ids::FileId;
use crate::types::StoredFile;

#[async_trait]
pub trait Files: Send + Sync {
    async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<StoredFile, BackendError>;

    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the file does not exist.
    async fn download(&self, id: &FileId) -> Result<Vec<u8>, BackendError>;

    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the file does not exist.
    async fn delete_file(&self, id: &FileId) -> Result<(), BackendError>;
}
