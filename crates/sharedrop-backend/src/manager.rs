//! Collaborator bundle built from the configured provider.

use std::sync::Arc;

use tracing::info;

use sharedrop_core::config::backend::{BackendConfig, BackendProvider};
use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::{AuthProvider, ObjectStore, RecordStore};

/// The three remote collaborators, selected at construction time based on
/// configuration.
///
/// One backend object implements all three traits; the bundle keeps a
/// typed handle to it as well so callers can reach provider-specific
/// features such as the HTTP bearer token.
#[derive(Debug, Clone)]
pub struct Backend {
    /// Authentication service.
    pub auth: Arc<dyn AuthProvider>,
    /// Binary object store.
    pub storage: Arc<dyn ObjectStore>,
    /// Structured record store.
    pub records: Arc<dyn RecordStore>,
    /// The HTTP backend, when that provider is in use.
    #[cfg(feature = "http")]
    pub http: Option<Arc<crate::http::HttpBackend>>,
    /// The memory backend, when that provider is in use.
    #[cfg(feature = "memory")]
    pub memory: Option<Arc<crate::memory::MemoryBackend>>,
}

impl Backend {
    /// Build the collaborators named by `config.provider`.
    pub fn from_config(config: &BackendConfig) -> AppResult<Self> {
        match config.provider {
            #[cfg(feature = "http")]
            BackendProvider::Http => {
                info!(base_url = %config.base_url, "Initializing HTTP backend");
                let backend = Arc::new(crate::http::HttpBackend::new(config)?);
                Ok(Self::from_http(backend))
            }
            #[cfg(feature = "memory")]
            BackendProvider::Memory => {
                info!("Initializing in-memory backend");
                let backend = Arc::new(crate::memory::MemoryBackend::new(&config.bucket));
                Ok(Self::from_memory(backend))
            }
            #[allow(unreachable_patterns)]
            other => Err(AppError::configuration(format!(
                "Backend provider {other:?} is not compiled in"
            ))),
        }
    }

    /// Wrap an existing HTTP backend.
    #[cfg(feature = "http")]
    pub fn from_http(backend: Arc<crate::http::HttpBackend>) -> Self {
        Self {
            auth: backend.clone(),
            storage: backend.clone(),
            records: backend.clone(),
            http: Some(backend),
            #[cfg(feature = "memory")]
            memory: None,
        }
    }

    /// Wrap an existing memory backend (for testing).
    #[cfg(feature = "memory")]
    pub fn from_memory(backend: Arc<crate::memory::MemoryBackend>) -> Self {
        Self {
            auth: backend.clone(),
            storage: backend.clone(),
            records: backend.clone(),
            #[cfg(feature = "http")]
            http: None,
            memory: Some(backend),
        }
    }
}

#[cfg(all(test, feature = "http", feature = "memory"))]
mod tests {
    use super::*;

    #[test]
    fn test_memory_provider_from_config() {
        let config = BackendConfig {
            provider: BackendProvider::Memory,
            ..Default::default()
        };
        let backend = Backend::from_config(&config).expect("memory backend");
        assert!(backend.memory.is_some());
        assert!(backend.http.is_none());
    }

    #[test]
    fn test_http_provider_from_config() {
        let backend = Backend::from_config(&BackendConfig::default()).expect("http backend");
        assert!(backend.http.is_some());
        assert!(backend.memory.is_none());
    }
}
