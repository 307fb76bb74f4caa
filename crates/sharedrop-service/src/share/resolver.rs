//! Share page flow: resolve a token to one file and act on it.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use sharedrop_backend::FileRepository;
use sharedrop_core::config::ShareConfig;
use sharedrop_core::traits::{Clipboard, Notice, NoticeSink};
use sharedrop_core::types::ShareToken;
use sharedrop_entity::FileRecord;
use sharedrop_entity::share::parse_share_reference;

/// Shown when no file carries the token.
pub const NOT_FOUND_MESSAGE: &str = "File not found or no longer available";

/// Shown when the lookup itself failed.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load file";

/// Where a share page is in its lifecycle. Once it leaves `Loading` it
/// never changes state again.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "file", rename_all = "snake_case")]
pub enum ShareState {
    /// The lookup has not completed.
    Loading,
    /// Exactly one file carries the token.
    Found(FileRecord),
    /// No file carries the token.
    NotFound,
    /// The lookup failed.
    Error,
}

impl ShareState {
    /// Message to show for terminal non-found states.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::NotFound => Some(NOT_FOUND_MESSAGE),
            Self::Error => Some(LOAD_FAILED_MESSAGE),
            Self::Loading | Self::Found(_) => None,
        }
    }
}

/// One opened share page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharePage {
    /// The URL the page was opened with.
    page_url: String,
    /// Token parsed from the reference, if any.
    token: Option<ShareToken>,
    /// Current state.
    state: ShareState,
}

impl SharePage {
    /// The URL the page was opened with.
    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    /// The token being resolved.
    pub fn token(&self) -> Option<&ShareToken> {
        self.token.as_ref()
    }

    /// Current state.
    pub fn state(&self) -> &ShareState {
        &self.state
    }

    /// The resolved file.
    pub fn file(&self) -> Option<&FileRecord> {
        match &self.state {
            ShareState::Found(file) => Some(file),
            _ => None,
        }
    }

    /// URL to render inline, for image files only.
    pub fn preview(&self) -> Option<&str> {
        self.file()
            .filter(|f| f.is_previewable())
            .map(|f| f.storage_url.as_str())
    }
}

/// Resolves share tokens for anonymous visitors.
pub struct ShareResolver {
    /// File record repository.
    files: FileRepository,
    /// Notice destination.
    notices: Arc<dyn NoticeSink>,
    /// Clipboard for the copy-link action.
    clipboard: Arc<dyn Clipboard>,
    /// Share link settings.
    config: ShareConfig,
}

impl std::fmt::Debug for ShareResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareResolver")
            .field("files", &self.files)
            .field("config", &self.config)
            .finish()
    }
}

impl ShareResolver {
    /// Creates a new resolver.
    pub fn new(
        files: FileRepository,
        notices: Arc<dyn NoticeSink>,
        clipboard: Arc<dyn Clipboard>,
        config: ShareConfig,
    ) -> Self {
        Self {
            files,
            notices,
            clipboard,
            config,
        }
    }

    /// A page in the `Loading` state for a bare token or a share URL.
    ///
    /// A bare token gets the canonical share URL as its page URL.
    pub fn page(&self, reference: &str) -> SharePage {
        let reference = reference.trim();
        let token = parse_share_reference(reference);
        let page_url = match &token {
            Some(token) if reference == token.as_str() => self.config.share_url(token.as_str()),
            _ => reference.to_string(),
        };
        SharePage {
            page_url,
            token,
            state: ShareState::Loading,
        }
    }

    /// Open a page and resolve it.
    pub async fn open(&self, reference: &str) -> SharePage {
        let mut page = self.page(reference);
        self.resolve(&mut page).await;
        page
    }

    /// Look the token up once. Pages that already left `Loading` are not
    /// looked up again.
    pub async fn resolve(&self, page: &mut SharePage) {
        if page.state != ShareState::Loading {
            return;
        }

        let Some(token) = page.token.clone() else {
            warn!(reference = %page.page_url, "Unrecognized share reference");
            page.state = ShareState::NotFound;
            return;
        };

        page.state = match self
            .files
            .find_by_share_token(&token, self.config.require_public)
            .await
        {
            Ok(Some(file)) => {
                info!(file_id = %file.id, "Share resolved");
                ShareState::Found(file)
            }
            Ok(None) => {
                info!(token = %token, "No file for share token");
                ShareState::NotFound
            }
            Err(e) => {
                error!(token = %token, error = %e, "Share lookup failed");
                self.notices.notify(Notice::error(LOAD_FAILED_MESSAGE));
                ShareState::Error
            }
        };
    }

    /// Count a download and return the URL to fetch.
    ///
    /// The new count is computed from the page's copy of the record, so
    /// concurrent visitors can overwrite each other's increments.
    pub async fn download(&self, page: &mut SharePage) -> Option<String> {
        let ShareState::Found(file) = &mut page.state else {
            return None;
        };

        let next = file.download_count + 1;
        match self.files.set_download_count(&file.id, next).await {
            Ok(_) => {
                file.download_count = next;
                info!(file_id = %file.id, downloads = next, "Shared file downloaded");
                self.notices.notify(Notice::success("Download started"));
                Some(file.storage_url.clone())
            }
            Err(e) => {
                error!(file_id = %file.id, error = %e, "Failed to count download");
                self.notices.notify(Notice::error("Failed to download file"));
                None
            }
        }
    }

    /// Copy the page URL to the clipboard.
    pub fn copy_link(&self, page: &SharePage) -> bool {
        if page.file().is_none() {
            return false;
        }
        match self.clipboard.write_text(&page.page_url) {
            Ok(()) => {
                self.notices.notify(Notice::success("Link copied to clipboard"));
                true
            }
            Err(e) => {
                error!(error = %e, "Clipboard write failed");
                self.notices.notify(Notice::error("Failed to copy link"));
                false
            }
        }
    }
}
