//! [`ObjectStore`] over the REST contract.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::info;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::{ObjectStore, StoredObject};

use super::HttpBackend;
use super::error::transport_error;

#[async_trait]
impl ObjectStore for HttpBackend {
    async fn upload(&self, name: &str, data: Bytes, content_type: &str) -> AppResult<StoredObject> {
        let url = self.endpoint(&["api", "storage", "buckets", self.bucket.as_str(), "objects", name])?;
        let size = data.len();

        let part = Part::bytes(data.to_vec())
            .file_name(name.to_string())
            .mime_str(content_type)
            .map_err(|e| AppError::validation(format!("Invalid content type '{content_type}': {e}")))?;
        let form = Form::new().part("file", part);

        let mut stored: StoredObject = self
            .send_json(self.request(Method::PUT, url).multipart(form))
            .await?;
        stored.url = self.absolute_url(&stored.url)?.to_string();

        info!(key = %stored.key, size, "Object uploaded");
        Ok(stored)
    }

    async fn fetch(&self, url: &str) -> AppResult<Bytes> {
        let url = self.absolute_url(url)?;
        let response = self.send(self.request(Method::GET, url)).await?;
        response.bytes().await.map_err(transport_error)
    }
}
