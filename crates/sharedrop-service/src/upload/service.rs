//! Sequential batch upload.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use sharedrop_backend::FileRepository;
use sharedrop_core::config::UploadConfig;
use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::{Notice, NoticeSink, ObjectStore};
use sharedrop_core::types::User;
use sharedrop_entity::{FileRecord, NewFileRecord};

use super::source::LocalFile;
use crate::session::SessionService;
use crate::share::LinkService;

/// Outcome of one batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadReport {
    /// Records created, in upload order.
    pub uploaded: Vec<FileRecord>,
    /// Names of the files that failed.
    pub failed: Vec<String>,
    /// Set when the batch was refused because nobody is signed in.
    pub rejected: bool,
}

impl UploadReport {
    /// Whether every file of the batch was uploaded.
    pub fn is_success(&self) -> bool {
        !self.rejected && self.failed.is_empty()
    }
}

/// Counts one in-flight batch until dropped.
struct UploadingGuard<'a>(&'a AtomicUsize);

impl<'a> UploadingGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for UploadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Uploads batches of local files for the signed-in user.
pub struct UploadService {
    /// Current identity.
    session: Arc<SessionService>,
    /// Object storage.
    storage: Arc<dyn ObjectStore>,
    /// File record repository.
    files: FileRepository,
    /// Share token generator.
    links: LinkService,
    /// Notice destination.
    notices: Arc<dyn NoticeSink>,
    /// Upload limits.
    config: UploadConfig,
    /// Number of batches in flight.
    uploading: AtomicUsize,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService")
            .field("config", &self.config)
            .field("uploading", &self.is_uploading())
            .finish()
    }
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        session: Arc<SessionService>,
        storage: Arc<dyn ObjectStore>,
        files: FileRepository,
        notices: Arc<dyn NoticeSink>,
        config: UploadConfig,
    ) -> Self {
        Self {
            session,
            storage,
            files,
            links: LinkService::new(),
            notices,
            config,
            uploading: AtomicUsize::new(0),
        }
    }

    /// Whether any batch is in flight.
    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst) > 0
    }

    /// Uploads `batch` one file at a time.
    ///
    /// `on_complete` receives each created record as soon as it exists.
    /// A failing file is reported and skipped; the rest of the batch still
    /// runs.
    pub async fn upload_batch<F>(&self, batch: Vec<LocalFile>, mut on_complete: F) -> UploadReport
    where
        F: FnMut(&FileRecord),
    {
        let mut report = UploadReport::default();

        let Some(user) = self.session.user().await else {
            warn!(files = batch.len(), "Upload refused without a session");
            self.notices.notify(Notice::error("Please sign in to upload files"));
            report.rejected = true;
            return report;
        };

        let _guard = UploadingGuard::enter(&self.uploading);

        for file in batch {
            match self.upload_one(&user, &file).await {
                Ok(record) => {
                    info!(file_id = %record.id, name = %file.name, size = record.size, "File uploaded");
                    on_complete(&record);
                    self.notices
                        .notify(Notice::success(format!("{} uploaded successfully!", file.name)));
                    report.uploaded.push(record);
                }
                Err(e) => {
                    error!(name = %file.name, error = %e, "Upload failed");
                    self.notices
                        .notify(Notice::error(format!("Failed to upload {}", file.name)));
                    report.failed.push(file.name);
                }
            }
        }

        report
    }

    /// Store one file and insert its record. A stored object whose record
    /// insert fails is left in place.
    async fn upload_one(&self, user: &User, file: &LocalFile) -> AppResult<FileRecord> {
        if file.size() > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        let stored_name = format!("{}-{}", Utc::now().timestamp_millis(), file.name);
        let stored = self
            .storage
            .upload(&stored_name, file.data.clone(), &file.content_type)
            .await?;

        let record = NewFileRecord {
            user_id: user.id.clone(),
            name: stored_name,
            original_name: file.name.clone(),
            size: file.size(),
            mime_type: file.content_type.clone(),
            storage_url: stored.url,
            storage_key: stored.key,
            share_token: self.links.generate_token(),
            is_public: false,
        };
        self.files.insert(&record).await
    }
}
