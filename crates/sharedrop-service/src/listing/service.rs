//! Listing flow: load the owner's files and act on them.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use sharedrop_backend::FileRepository;
use sharedrop_core::config::ShareConfig;
use sharedrop_core::error::AppError;
use sharedrop_core::traits::{Clipboard, Notice, NoticeSink};
use sharedrop_core::types::FileId;
use sharedrop_entity::{FileEvent, FileRecord, FileRecordPatch};

use super::ledger::{FileLedger, FileStats};
use crate::session::SessionService;

/// Owns the local listing of the signed-in user's files.
///
/// Every remote outcome is reported as a notice; nothing here returns an
/// error to the caller.
pub struct ListingService {
    /// Current identity.
    session: Arc<SessionService>,
    /// File record repository.
    files: FileRepository,
    /// Notice destination.
    notices: Arc<dyn NoticeSink>,
    /// Clipboard for share links.
    clipboard: Arc<dyn Clipboard>,
    /// Share link settings.
    share: ShareConfig,
    /// Local listing.
    ledger: RwLock<FileLedger>,
    /// Files with a delete call in flight.
    deleting: Mutex<HashSet<FileId>>,
}

impl std::fmt::Debug for ListingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingService")
            .field("files", &self.files)
            .field("share", &self.share)
            .finish()
    }
}

impl ListingService {
    /// Creates a listing service with an empty listing.
    pub fn new(
        session: Arc<SessionService>,
        files: FileRepository,
        notices: Arc<dyn NoticeSink>,
        clipboard: Arc<dyn Clipboard>,
        share: ShareConfig,
    ) -> Self {
        Self {
            session,
            files,
            notices,
            clipboard,
            share,
            ledger: RwLock::new(FileLedger::new()),
            deleting: Mutex::new(HashSet::new()),
        }
    }

    /// Listed files, newest first.
    pub async fn files(&self) -> Vec<FileRecord> {
        self.ledger.read().await.files().to_vec()
    }

    /// Current aggregates.
    pub async fn stats(&self) -> FileStats {
        self.ledger.read().await.stats()
    }

    /// Look up a listed file.
    pub async fn get(&self, id: &FileId) -> Option<FileRecord> {
        self.ledger.read().await.get(id).cloned()
    }

    /// Events applied to the listing so far.
    pub async fn events(&self) -> Vec<FileEvent> {
        self.ledger.read().await.events().to_vec()
    }

    /// Whether a delete of `id` is in flight.
    pub fn is_deleting(&self, id: &FileId) -> bool {
        self.deleting
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(id)
    }

    async fn apply(&self, event: FileEvent) {
        self.ledger.write().await.apply(event);
    }

    /// Fetch the signed-in user's files, newest first. Without a user the
    /// listing is left untouched. On failure the listing is emptied.
    pub async fn load(&self) -> bool {
        let Some(user) = self.session.user().await else {
            return false;
        };

        match self.files.list_by_owner(&user.id).await {
            Ok(files) => {
                info!(user_id = %user.id, count = files.len(), "Loaded files");
                self.apply(FileEvent::Loaded(files)).await;
                true
            }
            Err(e) => {
                error!(user_id = %user.id, error = %e, "Failed to load files");
                self.apply(FileEvent::Loaded(Vec::new())).await;
                self.notices.notify(Notice::error("Failed to load files"));
                false
            }
        }
    }

    /// Add a freshly uploaded record to the front of the listing.
    pub async fn record_created(&self, file: FileRecord) {
        self.apply(FileEvent::Created(file)).await;
    }

    /// Delete a file. Requires a signed-in user.
    pub async fn delete(&self, id: &FileId) -> bool {
        if !self.session.is_authenticated().await {
            return false;
        }

        self.deleting
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.clone());
        let result = self.files.delete(id).await;
        self.deleting
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);

        match result {
            Ok(()) => {
                info!(file_id = %id, "File deleted");
                self.apply(FileEvent::Deleted(id.clone())).await;
                self.notices.notify(Notice::success("File deleted successfully"));
                true
            }
            Err(e) => {
                error!(file_id = %id, error = %e, "Failed to delete file");
                self.notices.notify(Notice::error("Failed to delete file"));
                false
            }
        }
    }

    /// Flip a file between public and private. Requires a signed-in user.
    pub async fn toggle_visibility(&self, id: &FileId) -> Option<FileRecord> {
        if !self.session.is_authenticated().await {
            return None;
        }

        let result = match self.get(id).await {
            Some(current) => {
                self.files
                    .update(id, &FileRecordPatch::visibility(!current.is_public))
                    .await
            }
            None => Err(AppError::not_found(format!("File {id} is not listed"))),
        };

        match result {
            Ok(updated) => {
                info!(file_id = %id, is_public = updated.is_public, "Visibility changed");
                let message = if updated.is_public {
                    "File made public"
                } else {
                    "File made private"
                };
                self.apply(FileEvent::Updated(updated.clone())).await;
                self.notices.notify(Notice::success(message));
                Some(updated)
            }
            Err(e) => {
                error!(file_id = %id, error = %e, "Failed to update visibility");
                self.notices
                    .notify(Notice::error("Failed to update file visibility"));
                None
            }
        }
    }

    /// Count a download of an owned file and return the URL to fetch.
    pub async fn download(&self, id: &FileId) -> Option<String> {
        let Some(file) = self.get(id).await else {
            warn!(file_id = %id, "Download of unlisted file");
            self.notices.notify(Notice::error("Failed to download file"));
            return None;
        };

        match self
            .files
            .set_download_count(id, file.download_count + 1)
            .await
        {
            Ok(_) => {
                info!(file_id = %id, "Download counted");
                self.apply(FileEvent::Downloaded(id.clone())).await;
                Some(file.storage_url)
            }
            Err(e) => {
                error!(file_id = %id, error = %e, "Failed to count download");
                self.notices.notify(Notice::error("Failed to download file"));
                None
            }
        }
    }

    /// Copy the public share link of a file to the clipboard.
    pub async fn copy_share_link(&self, id: &FileId) -> Option<String> {
        let url = self
            .get(id)
            .await
            .and_then(|f| f.share_token)
            .map(|token| self.share.share_url(token.as_str()));

        let Some(url) = url else {
            warn!(file_id = %id, "No share token for file");
            self.notices.notify(Notice::error("Failed to copy share link"));
            return None;
        };

        match self.clipboard.write_text(&url) {
            Ok(()) => {
                self.notices
                    .notify(Notice::success("Share link copied to clipboard"));
                Some(url)
            }
            Err(e) => {
                error!(file_id = %id, error = %e, "Clipboard write failed");
                self.notices.notify(Notice::error("Failed to copy share link"));
                None
            }
        }
    }
}
