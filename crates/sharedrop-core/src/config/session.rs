//! Local session persistence configuration.

use serde::{Deserialize, Serialize};

/// Where a front end keeps the access token between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the JSON session file.
    #[serde(default = "default_file")]
    pub file: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_file(),
        }
    }
}

fn default_file() -> String {
    "data/session.json".to_string()
}
