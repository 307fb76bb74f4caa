//! Shared fixtures for flow tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use sharedrop_backend::FileRepository;
use sharedrop_backend::memory::MemoryBackend;
use sharedrop_core::config::{ShareConfig, UploadConfig};
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::Clipboard;
use sharedrop_entity::FileRecord;
use sharedrop_service::{
    ListingService, LocalFile, NoticeLog, SessionService, ShareResolver, UploadService,
};

pub const EMAIL: &str = "owner@example.com";
pub const PASSWORD: &str = "correct horse";
pub const ORIGIN: &str = "https://drop.example.com";

/// Clipboard that remembers the last copied text.
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    text: Mutex<Option<String>>,
}

impl RecordingClipboard {
    pub fn contents(&self) -> Option<String> {
        self.text.lock().unwrap().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn write_text(&self, text: &str) -> AppResult<()> {
        *self.text.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

/// Every flow wired to one memory backend.
pub struct TestApp {
    pub backend: Arc<MemoryBackend>,
    pub session: Arc<SessionService>,
    pub notices: Arc<NoticeLog>,
    pub clipboard: Arc<RecordingClipboard>,
    pub listing: ListingService,
    pub uploads: UploadService,
    pub shares: ShareResolver,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(UploadConfig::default(), share_config(false))
    }

    pub fn with_config(upload: UploadConfig, share: ShareConfig) -> Self {
        let backend = Arc::new(MemoryBackend::default());
        let session = Arc::new(SessionService::new(backend.clone()));
        let notices = Arc::new(NoticeLog::new());
        let clipboard = Arc::new(RecordingClipboard::default());
        let files = FileRepository::new(backend.clone(), "files");

        let listing = ListingService::new(
            session.clone(),
            files.clone(),
            notices.clone(),
            clipboard.clone(),
            share.clone(),
        );
        let uploads = UploadService::new(
            session.clone(),
            backend.clone(),
            files.clone(),
            notices.clone(),
            upload,
        );
        let shares = ShareResolver::new(files, notices.clone(), clipboard.clone(), share);

        Self {
            backend,
            session,
            notices,
            clipboard,
            listing,
            uploads,
            shares,
        }
    }

    /// Register the owner account and sign it in.
    pub async fn sign_in(&self) {
        self.backend.register_user(EMAIL, PASSWORD);
        self.session.sign_in(EMAIL, PASSWORD).await.expect("sign in");
    }

    /// Upload one text file and return its record.
    pub async fn upload(&self, name: &str, contents: &str) -> FileRecord {
        let report = self
            .uploads
            .upload_batch(vec![text_file(name, contents)], |_| {})
            .await;
        report.uploaded.into_iter().next().expect("uploaded")
    }
}

pub fn share_config(require_public: bool) -> ShareConfig {
    ShareConfig {
        public_origin: ORIGIN.to_string(),
        require_public,
    }
}

pub fn text_file(name: &str, contents: &str) -> LocalFile {
    LocalFile::new(name, "text/plain", contents.as_bytes().to_vec())
}
