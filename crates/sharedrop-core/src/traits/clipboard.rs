//! Clipboard abstraction for copy-link actions.

use crate::result::AppResult;

/// Destination for copied text.
pub trait Clipboard: Send + Sync + 'static {
    /// Replace the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> AppResult<()>;
}
