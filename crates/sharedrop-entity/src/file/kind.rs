//! Display classification of free-text content types.

use serde::{Deserialize, Serialize};

/// Coarse file category derived from a content-type string.
///
/// Matching is by prefix/substring only, in declaration order; it is not a
/// MIME parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// `image/*`
    Image,
    /// `video/*`
    Video,
    /// `audio/*`
    Audio,
    /// Anything mentioning `pdf`.
    Pdf,
    /// Anything containing `text/`.
    Text,
    /// Anything mentioning `zip` or `rar`.
    Archive,
    /// Everything else.
    Other,
}

impl FileKind {
    /// Classify a content-type string.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else if mime.contains("pdf") {
            Self::Pdf
        } else if mime.contains("text/") {
            Self::Text
        } else if mime.contains("zip") || mime.contains("rar") {
            Self::Archive
        } else {
            Self::Other
        }
    }

    /// Glyph used when listing files.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Image => "🖼️",
            Self::Video => "🎥",
            Self::Audio => "🎵",
            Self::Pdf => "📄",
            Self::Text => "📝",
            Self::Archive => "📦",
            Self::Other => "📁",
        }
    }
}
