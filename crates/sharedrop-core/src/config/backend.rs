//! Remote collaborator (BaaS) configuration.

use serde::{Deserialize, Serialize};

/// Fallback base URL used when none is supplied externally.
pub const DEFAULT_BASE_URL: &str = "https://3929n3sz.us-east.insforge.app";

/// Which collaborator implementation to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    /// The remote HTTP service.
    #[default]
    Http,
    /// An in-process backend holding everything in memory.
    Memory,
}

/// Remote collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Collaborator implementation.
    #[serde(default)]
    pub provider: BackendProvider,
    /// Base URL of the remote service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional anonymous API key sent with every request.
    #[serde(default)]
    pub anon_key: Option<String>,
    /// Storage bucket receiving uploaded objects.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Record collection holding file metadata.
    #[serde(default = "default_files_collection")]
    pub files_collection: String,
    /// Per-request timeout. Unset means calls never time out.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendProvider::default(),
            base_url: default_base_url(),
            anon_key: None,
            bucket: default_bucket(),
            files_collection: default_files_collection(),
            request_timeout_seconds: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_bucket() -> String {
    "file-sharing".to_string()
}

fn default_files_collection() -> String {
    "files".to_string()
}
