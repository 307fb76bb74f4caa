//! Object storage collaborator trait.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Locators returned for an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Directly fetchable URL of the object.
    pub url: String,
    /// Storage key of the object within its bucket.
    pub key: String,
}

/// Trait for the remote binary object store.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Upload `data` under `name` and return its locators.
    async fn upload(&self, name: &str, data: Bytes, content_type: &str) -> AppResult<StoredObject>;

    /// Fetch the bytes behind a storage URL.
    async fn fetch(&self, url: &str) -> AppResult<Bytes>;
}
