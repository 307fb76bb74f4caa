//! Typed access to the file metadata collection.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::RecordStore;
use sharedrop_core::types::{FileId, RecordQuery, ShareToken, SortField, UserId};
use sharedrop_entity::file::model::columns;
use sharedrop_entity::{FileRecord, FileRecordPatch, NewFileRecord};

/// Repository for file record CRUD and share token lookup.
#[derive(Debug, Clone)]
pub struct FileRepository {
    records: Arc<dyn RecordStore>,
    collection: String,
}

impl FileRepository {
    /// Create a repository over `collection` in the given record store.
    pub fn new(records: Arc<dyn RecordStore>, collection: impl Into<String>) -> Self {
        Self {
            records,
            collection: collection.into(),
        }
    }

    fn decode(row: Value) -> AppResult<FileRecord> {
        Ok(serde_json::from_value(row)?)
    }

    fn by_id(id: &FileId) -> RecordQuery {
        RecordQuery::new().eq(columns::ID, id.as_str())
    }

    /// List a user's files, newest first.
    pub async fn list_by_owner(&self, user_id: &UserId) -> AppResult<Vec<FileRecord>> {
        let query = RecordQuery::new()
            .eq(columns::USER_ID, user_id.as_str())
            .order(SortField::desc(columns::CREATED_AT));
        let rows = self.records.select(&self.collection, &query).await?;
        debug!(user_id = %user_id, count = rows.len(), "Listed files");
        rows.into_iter().map(Self::decode).collect()
    }

    /// Find the single file carrying `token`.
    ///
    /// With `public_only` set, private files are treated as absent.
    pub async fn find_by_share_token(
        &self,
        token: &ShareToken,
        public_only: bool,
    ) -> AppResult<Option<FileRecord>> {
        let mut query = RecordQuery::new().eq(columns::SHARE_TOKEN, token.as_str());
        if public_only {
            query = query.eq(columns::IS_PUBLIC, true);
        }
        self.records
            .select_single(&self.collection, &query)
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// Insert a new record and return it with server-assigned fields.
    pub async fn insert(&self, record: &NewFileRecord) -> AppResult<FileRecord> {
        let row = serde_json::to_value(record)?;
        let stored = self.records.insert(&self.collection, vec![row]).await?;
        let row = stored
            .into_iter()
            .next()
            .ok_or_else(|| AppError::database("Insert returned no rows"))?;
        Self::decode(row)
    }

    /// Apply `patch` to the record with `id` and return the updated record.
    pub async fn update(&self, id: &FileId, patch: &FileRecordPatch) -> AppResult<FileRecord> {
        let patch = serde_json::to_value(patch)?;
        let rows = self
            .records
            .update(&self.collection, &Self::by_id(id), patch)
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        Self::decode(row)
    }

    /// Overwrite the download counter of the record with `id`.
    pub async fn set_download_count(&self, id: &FileId, count: u64) -> AppResult<FileRecord> {
        self.update(id, &FileRecordPatch::download_count(count)).await
    }

    /// Delete the record with `id`.
    pub async fn delete(&self, id: &FileId) -> AppResult<()> {
        self.records.delete(&self.collection, &Self::by_id(id)).await
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use sharedrop_core::error::ErrorKind;

    use super::*;
    use crate::memory::MemoryBackend;

    fn new_record(user: &str, token: &str, is_public: bool) -> NewFileRecord {
        NewFileRecord {
            user_id: UserId::new(user),
            name: format!("1700000000000-{token}.txt"),
            original_name: format!("{token}.txt"),
            size: 10,
            mime_type: "text/plain".into(),
            storage_url: format!("memory://file-sharing/{token}"),
            storage_key: token.into(),
            share_token: ShareToken::new(token),
            is_public,
        }
    }

    fn repository() -> (Arc<MemoryBackend>, FileRepository) {
        let backend = Arc::new(MemoryBackend::default());
        let repo = FileRepository::new(backend.clone(), "files");
        (backend, repo)
    }

    #[tokio::test]
    async fn test_insert_and_list_by_owner() {
        let (_, repo) = repository();
        repo.insert(&new_record("u1", "a", false)).await.expect("a");
        repo.insert(&new_record("u2", "b", false)).await.expect("b");
        repo.insert(&new_record("u1", "c", false)).await.expect("c");

        let files = repo.list_by_owner(&UserId::new("u1")).await.expect("list");
        let names: Vec<_> = files.iter().map(|f| f.original_name.as_str()).collect();
        assert_eq!(names, ["c.txt", "a.txt"]);
        assert!(files.iter().all(|f| f.download_count == 0));
    }

    #[tokio::test]
    async fn test_find_by_share_token_respects_public_only() {
        let (_, repo) = repository();
        repo.insert(&new_record("u1", "tok", false)).await.expect("insert");

        let token = ShareToken::new("tok");
        assert!(repo.find_by_share_token(&token, false).await.expect("any").is_some());
        assert!(repo.find_by_share_token(&token, true).await.expect("public").is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (_, repo) = repository();
        let err = repo
            .update(&FileId::new("nope"), &FileRecordPatch::visibility(true))
            .await
            .expect_err("missing");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_set_download_count_and_delete() {
        let (backend, repo) = repository();
        let file = repo.insert(&new_record("u1", "a", true)).await.expect("insert");

        let updated = repo.set_download_count(&file.id, 3).await.expect("count");
        assert_eq!(updated.download_count, 3);

        repo.delete(&file.id).await.expect("delete");
        assert!(backend.rows("files").is_empty());
    }
}
