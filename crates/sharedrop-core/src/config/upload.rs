//! Upload flow configuration.

use serde::{Deserialize, Serialize};

/// Upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum size of a single file in bytes (default 5 GB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_max_upload() -> u64 {
    5_368_709_120 // 5 GB
}
