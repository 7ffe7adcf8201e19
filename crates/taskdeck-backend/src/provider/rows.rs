use async_trait::async_trait;
use serde_json::Value;

use crate::error::BackendError;
use crate::ids::RowId;
use crate::types::Row;

#[async_trait]
pub trait Rows: Send + Sync {
    /// Create a row in `table`. When `id` is given, the row is created
    /// under that id (restoring a previously deleted row, for instance);
    /// otherwise the backend mints one.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::AlreadyExists`] if an explicit `id` is
    /// already taken.
    async fn create_row(
        &self,
        table: &str,
        id: Option<RowId>,
        data: Value,
    ) -> Result<Row, BackendError>;

    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the row does not exist.
    async fn get_row(&self, table: &str, id: &RowId) -> Result<Row, BackendError>;

    /// Merge the top-level fields of `data` into the row's document and
    /// return the updated row.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the row does not exist.
    async fn update_row(&self, table: &str, id: &RowId, data: Value) -> Result<Row, BackendError>;

    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the row does not exist.
    async fn delete_row(&self, table: &str, id: &RowId) -> Result<(), BackendError>;

    /// Rows of `table` whose `field` equals `value`.
    async fn query_rows(
        &self,
        table: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Row>, BackendError>;
}
