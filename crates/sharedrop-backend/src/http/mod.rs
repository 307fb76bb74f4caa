//! HTTP client for the remote BaaS.
//!
//! One [`HttpBackend`] implements all three collaborator traits against
//! the service's REST contract:
//!
//! - auth under `/api/auth/...`
//! - objects under `/api/storage/buckets/{bucket}/objects/{key}`
//! - records under `/api/database/records/{collection}` with
//!   `field=eq.value` filters and `order=field.dir`

mod auth;
mod error;
mod records;
mod storage;

use std::sync::RwLock;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use sharedrop_core::config::BackendConfig;
use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;

pub use self::error::ErrorBody;

/// Header carrying the anonymous API key.
const API_KEY_HEADER: &str = "apikey";

/// REST client for the remote service.
pub struct HttpBackend {
    /// Shared connection pool.
    client: Client,
    /// Parsed base URL.
    base_url: Url,
    /// Anonymous API key, if configured.
    anon_key: Option<String>,
    /// Bucket receiving uploads.
    bucket: String,
    /// Bearer token of the signed-in session.
    access_token: RwLock<Option<String>>,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url.as_str())
            .field("bucket", &self.bucket)
            .field("has_session", &self.access_token().is_some())
            .finish()
    }
}

impl HttpBackend {
    /// Create a new client from configuration.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::configuration(format!("Invalid backend base URL '{}': {e}", config.base_url))
        })?;

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            anon_key: config.anon_key.clone(),
            bucket: config.bucket.clone(),
            access_token: RwLock::new(None),
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The bearer token of the current session, if any.
    pub fn access_token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the bearer token (e.g. restored from a previous run).
    pub fn set_access_token(&self, token: Option<String>) {
        let mut guard = self.access_token.write().unwrap_or_else(|e| e.into_inner());
        *guard = token;
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::configuration("Backend base URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolve a possibly relative URL returned by the service.
    pub(crate) fn absolute_url(&self, url: &str) -> AppResult<Url> {
        self.base_url
            .join(url)
            .map_err(|e| AppError::storage(format!("Invalid storage URL '{url}': {e}")))
    }

    /// Headers attached to every request.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(key) = &self.anon_key {
            if let Ok(value) = HeaderValue::from_str(key) {
                headers.insert(API_KEY_HEADER, value);
            }
        }
        let bearer = self.access_token().or_else(|| self.anon_key.clone());
        if let Some(token) = bearer {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    /// Start a request with authentication headers applied.
    pub(crate) fn request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "Remote call");
        self.client.request(method, url).headers(self.default_headers())
    }

    /// Send a request, mapping transport and HTTP errors.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> AppResult<Response> {
        let response = builder.send().await.map_err(error::transport_error)?;
        error::check_status(response).await
    }

    /// Send a request and decode a JSON response body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> AppResult<T> {
        let response = self.send(builder).await?;
        response.json::<T>().await.map_err(error::transport_error)
    }
}
