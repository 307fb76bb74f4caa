//! Per-invocation wiring of configuration, backend, and flows.

use std::sync::Arc;

use tracing::debug;

use sharedrop_backend::{Backend, FileRepository};
use sharedrop_core::config::AppConfig;
use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::{Clipboard, NoticeSink};
use sharedrop_core::types::User;
use sharedrop_service::{ListingService, SessionService, ShareResolver, UploadService};

use crate::output::{PrintNotices, StdoutClipboard};
use crate::session_file::{SessionFile, StoredSession};

/// Everything a command needs.
pub struct CliContext {
    pub config: AppConfig,
    pub backend: Backend,
    pub session: Arc<SessionService>,
    session_file: SessionFile,
    notices: Arc<dyn NoticeSink>,
    clipboard: Arc<dyn Clipboard>,
}

impl CliContext {
    /// Build the backend and restore a saved access token, if any.
    pub async fn open(config: AppConfig) -> AppResult<Self> {
        let backend = Backend::from_config(&config.backend)?;
        let session_file = SessionFile::new(&config.session.file);

        if let Some(http) = &backend.http {
            if let Some(stored) = session_file.load().await? {
                debug!(email = ?stored.email, "Restored saved session");
                http.set_access_token(Some(stored.access_token));
            }
        }

        let session = Arc::new(SessionService::new(backend.auth.clone()));
        Ok(Self {
            config,
            backend,
            session,
            session_file,
            notices: Arc::new(PrintNotices),
            clipboard: Arc::new(StdoutClipboard),
        })
    }

    /// Save or forget the access token to match the backend.
    pub async fn persist_session(&self) -> AppResult<()> {
        let Some(http) = &self.backend.http else {
            return Ok(());
        };
        match http.access_token() {
            Some(access_token) => {
                let email = self.session.user().await.map(|u| u.email);
                self.session_file
                    .save(&StoredSession {
                        access_token,
                        email,
                    })
                    .await
            }
            None => self.session_file.clear().await,
        }
    }

    /// Resolve the session and return the signed-in user.
    pub async fn require_user(&self) -> AppResult<User> {
        self.session.initialize().await.user.ok_or_else(|| {
            AppError::authentication("Not signed in. Run `sharedrop login` first.")
        })
    }

    fn files(&self) -> FileRepository {
        FileRepository::new(
            self.backend.records.clone(),
            self.config.backend.files_collection.clone(),
        )
    }

    pub fn listing(&self) -> ListingService {
        ListingService::new(
            self.session.clone(),
            self.files(),
            self.notices.clone(),
            self.clipboard.clone(),
            self.config.share.clone(),
        )
    }

    pub fn uploads(&self) -> UploadService {
        UploadService::new(
            self.session.clone(),
            self.backend.storage.clone(),
            self.files(),
            self.notices.clone(),
            self.config.upload.clone(),
        )
    }

    pub fn shares(&self) -> ShareResolver {
        ShareResolver::new(
            self.files(),
            self.notices.clone(),
            self.clipboard.clone(),
            self.config.share.clone(),
        )
    }

    /// Fetch the bytes behind `url` and write them to `path`.
    pub async fn save_object(&self, url: &str, path: &str) -> AppResult<u64> {
        let data = self.backend.storage.fetch(url).await?;
        tokio::fs::write(path, &data).await?;
        Ok(data.len() as u64)
    }
}
