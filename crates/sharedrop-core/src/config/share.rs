//! Share link configuration.

use serde::{Deserialize, Serialize};

/// Share link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Origin prepended to `/share/<token>` when building share links.
    #[serde(default = "default_public_origin")]
    pub public_origin: String,
    /// When set, anonymous lookups only resolve records marked public.
    #[serde(default)]
    pub require_public: bool,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            public_origin: default_public_origin(),
            require_public: false,
        }
    }
}

impl ShareConfig {
    /// Build the absolute share URL for a token.
    pub fn share_url(&self, token: &str) -> String {
        format!("{}/share/{}", self.public_origin.trim_end_matches('/'), token)
    }
}

fn default_public_origin() -> String {
    "http://localhost:3000".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_url_trims_trailing_slash() {
        let config = ShareConfig {
            public_origin: "https://drop.example.com/".to_string(),
            require_public: false,
        };
        assert_eq!(
            config.share_url("abc123"),
            "https://drop.example.com/share/abc123"
        );
    }
}
