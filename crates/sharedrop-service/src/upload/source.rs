//! Local files selected for upload.

use std::path::Path;

use bytes::Bytes;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;

/// Content type used when the extension is unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file read into memory, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFile {
    /// File name as the user supplied it.
    pub name: String,
    /// Content type.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

impl LocalFile {
    /// Creates a local file from in-memory contents.
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Reads a file from disk, guessing its content type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::validation(format!("Not a file path: {}", path.display()))
            })?
            .to_string();
        let data = tokio::fs::read(path).await?;
        let content_type =
            mime_from_path(&name).unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        Ok(Self::new(name, content_type, data))
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Guess the content type from a file name extension.
pub fn mime_from_path(path: &str) -> Option<String> {
    let (_, ext) = path.rsplit_once('.')?;
    let mime = match ext.to_lowercase().as_str() {
        "txt" | "md" | "log" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "rar" => "application/vnd.rar",
        "7z" => "application/x-7z-compressed",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => return None,
    };
    Some(mime.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_mime_detection() {
        assert_eq!(mime_from_path("report.pdf"), Some("application/pdf".into()));
        assert_eq!(mime_from_path("IMG.PNG"), Some("image/png".into()));
        assert_eq!(mime_from_path("archive.rar"), Some("application/vnd.rar".into()));
        assert_eq!(mime_from_path("noext"), None);
    }

    #[tokio::test]
    async fn test_from_path_reads_contents() {
        let mut file = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .expect("tempfile");
        file.write_all(b"hello").expect("write");

        let local = LocalFile::from_path(file.path()).await.expect("read");
        assert_eq!(local.size(), 5);
        assert_eq!(local.content_type, "text/plain");
        assert!(local.name.ends_with(".txt"));
    }

    #[tokio::test]
    async fn test_from_path_unknown_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("blob.xyz");
        std::fs::write(&path, [0u8; 3]).expect("write");

        let local = LocalFile::from_path(&path).await.expect("read");
        assert_eq!(local.name, "blob.xyz");
        assert_eq!(local.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = LocalFile::from_path("/definitely/not/here.txt")
            .await
            .expect_err("missing");
        assert_eq!(err.kind, sharedrop_core::error::ErrorKind::Internal);
    }
}
