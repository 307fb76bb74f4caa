//! Record store collaborator trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::query::RecordQuery;

/// Trait for the remote structured record store.
///
/// Rows travel as JSON objects; typed repositories in other crates
/// convert them to domain entities.
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug + 'static {
    /// Select every row in `collection` matching `query`, in query order.
    async fn select(&self, collection: &str, query: &RecordQuery) -> AppResult<Vec<Value>>;

    /// Select at most one row. `Ok(None)` when nothing matches; an error
    /// when more than one row matches.
    async fn select_single(&self, collection: &str, query: &RecordQuery)
    -> AppResult<Option<Value>>;

    /// Insert rows and return them as stored (with server-assigned fields).
    async fn insert(&self, collection: &str, rows: Vec<Value>) -> AppResult<Vec<Value>>;

    /// Apply `patch` to every matching row and return the updated rows.
    async fn update(
        &self,
        collection: &str,
        query: &RecordQuery,
        patch: Value,
    ) -> AppResult<Vec<Value>>;

    /// Delete every matching row.
    async fn delete(&self, collection: &str, query: &RecordQuery) -> AppResult<()>;
}
