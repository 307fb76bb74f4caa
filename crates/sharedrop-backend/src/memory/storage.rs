//! [`ObjectStore`] over an in-memory map.

use async_trait::async_trait;
use bytes::Bytes;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::{ObjectStore, StoredObject};

use super::{MemoryBackend, Operation};

/// An uploaded object.
#[derive(Debug, Clone)]
pub(super) struct StoredBlob {
    data: Bytes,
    content_type: String,
}

impl MemoryBackend {
    fn object_url(&self, key: &str) -> String {
        format!("memory://{}/{}", self.bucket, key)
    }

    /// Content type recorded for `key`, if the object exists.
    pub fn object_content_type(&self, key: &str) -> Option<String> {
        self.objects.get(key).map(|blob| blob.content_type.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn upload(&self, name: &str, data: Bytes, content_type: &str) -> AppResult<StoredObject> {
        self.enter(Operation::Upload, name)?;
        if self.objects.contains_key(name) {
            return Err(AppError::storage(format!("Object {name} already exists")));
        }
        self.objects.insert(
            name.to_string(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(StoredObject {
            url: self.object_url(name),
            key: name.to_string(),
        })
    }

    async fn fetch(&self, url: &str) -> AppResult<Bytes> {
        self.enter(Operation::Fetch, url)?;
        let prefix = self.object_url("");
        let key = url.strip_prefix(&prefix).unwrap_or(url);
        self.objects
            .get(key)
            .map(|blob| blob.data.clone())
            .ok_or_else(|| AppError::storage(format!("Object {key} not found")))
    }
}

#[cfg(test)]
mod tests {
    use sharedrop_core::error::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn test_upload_then_fetch() {
        let backend = MemoryBackend::new("files");
        let stored = backend
            .upload("1-a.txt", Bytes::from_static(b"hello"), "text/plain")
            .await
            .expect("upload");
        assert_eq!(stored.url, "memory://files/1-a.txt");
        assert_eq!(stored.key, "1-a.txt");
        assert_eq!(
            backend.object_content_type("1-a.txt").as_deref(),
            Some("text/plain")
        );

        let data = backend.fetch(&stored.url).await.expect("fetch");
        assert_eq!(&data[..], b"hello");
    }

    #[tokio::test]
    async fn test_duplicate_key_rejected() {
        let backend = MemoryBackend::default();
        backend
            .upload("k", Bytes::new(), "text/plain")
            .await
            .expect("first");
        let err = backend
            .upload("k", Bytes::new(), "text/plain")
            .await
            .expect_err("second");
        assert_eq!(err.kind, ErrorKind::Storage);
        assert_eq!(backend.object_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let backend = MemoryBackend::default();
        let err = backend
            .fetch("memory://file-sharing/none")
            .await
            .expect_err("missing");
        assert_eq!(err.kind, ErrorKind::Storage);
    }
}
