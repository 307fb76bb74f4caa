//! Application configuration schemas.
//!
//! Configuration is deserialized from an optional TOML file merged with
//! `SHAREDROP_`-prefixed environment variables via the `config` crate.
//! Every section has defaults, so an empty configuration is valid.

pub mod backend;
pub mod logging;
pub mod session;
pub mod share;
pub mod upload;

use serde::{Deserialize, Serialize};

pub use self::backend::{BackendConfig, BackendProvider};
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;
pub use self::share::ShareConfig;
pub use self::upload::UploadConfig;

use crate::error::AppError;

/// Environment variable holding the externally supplied backend base URL.
pub const BASE_URL_ENV: &str = "SHAREDROP_URL";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote collaborator settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Upload flow settings.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Share link settings.
    #[serde(default)]
    pub share: ShareConfig,
    /// Local session persistence.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file (optional) and the environment.
    ///
    /// Nested keys use `__` in environment variables, e.g.
    /// `SHAREDROP_SHARE__REQUIRE_PUBLIC=true`. `SHAREDROP_URL` overrides
    /// `backend.base_url`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("SHAREDROP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("backend.base_url", std::env::var(BASE_URL_ENV).ok())?
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
