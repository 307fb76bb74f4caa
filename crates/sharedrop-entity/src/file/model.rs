//! File record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sharedrop_core::types::{FileId, ShareToken, UserId};

use super::kind::FileKind;

/// Column names used when filtering or ordering the file collection.
pub mod columns {
    /// Record identifier.
    pub const ID: &str = "id";
    /// Owner identifier.
    pub const USER_ID: &str = "user_id";
    /// Share token.
    pub const SHARE_TOKEN: &str = "share_token";
    /// Visibility flag.
    pub const IS_PUBLIC: &str = "is_public";
    /// Creation timestamp.
    pub const CREATED_AT: &str = "created_at";
}

/// Metadata for one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique record identifier, assigned by the remote service.
    pub id: FileId,
    /// The owner.
    pub user_id: UserId,
    /// Stored (collision-avoided) name.
    pub name: String,
    /// Name of the file as the user supplied it.
    pub original_name: String,
    /// File size in bytes.
    pub size: u64,
    /// Free-text content type.
    pub mime_type: String,
    /// Directly fetchable URL of the stored object.
    pub storage_url: String,
    /// Key of the stored object.
    pub storage_key: String,
    /// Token granting anonymous access.
    #[serde(default)]
    pub share_token: Option<ShareToken>,
    /// Visibility flag.
    #[serde(default)]
    pub is_public: bool,
    /// Number of recorded downloads.
    #[serde(default)]
    pub download_count: u64,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Classification of the content type.
    pub fn kind(&self) -> FileKind {
        FileKind::from_mime(&self.mime_type)
    }

    /// Whether an inline preview can be shown.
    pub fn is_previewable(&self) -> bool {
        self.kind() == FileKind::Image
    }

    /// Human-readable visibility label.
    pub fn visibility_label(&self) -> &'static str {
        if self.is_public { "Public" } else { "Private" }
    }
}

/// Data required to insert a new file record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFileRecord {
    /// The owner.
    pub user_id: UserId,
    /// Stored name.
    pub name: String,
    /// User-supplied name.
    pub original_name: String,
    /// File size in bytes.
    pub size: u64,
    /// Content type.
    pub mime_type: String,
    /// URL of the stored object.
    pub storage_url: String,
    /// Key of the stored object.
    pub storage_key: String,
    /// Share token.
    pub share_token: ShareToken,
    /// Initial visibility.
    pub is_public: bool,
}

/// Partial update of a file record; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRecordPatch {
    /// New visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    /// New download count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_count: Option<u64>,
}

impl FileRecordPatch {
    /// Patch setting the visibility flag.
    pub fn visibility(is_public: bool) -> Self {
        Self {
            is_public: Some(is_public),
            ..Default::default()
        }
    }

    /// Patch setting the download counter.
    pub fn download_count(count: u64) -> Self {
        Self {
            download_count: Some(count),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_row() -> serde_json::Value {
        json!({
            "id": "f1",
            "user_id": "u1",
            "name": "1700000000000-cat.png",
            "original_name": "cat.png",
            "size": 2048,
            "mime_type": "image/png",
            "storage_url": "https://cdn.example.com/cat.png",
            "storage_key": "1700000000000-cat.png",
            "share_token": "abc",
            "is_public": false,
            "download_count": 3,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    #[test]
    fn test_deserialize_row() {
        let record: FileRecord = serde_json::from_value(sample_row()).expect("parse");
        assert_eq!(record.id.as_str(), "f1");
        assert_eq!(record.size, 2048);
        assert_eq!(record.download_count, 3);
        assert!(record.is_previewable());
        assert_eq!(record.visibility_label(), "Private");
    }

    #[test]
    fn test_missing_token_and_counter_default() {
        let mut row = sample_row();
        let obj = row.as_object_mut().expect("object");
        obj.remove("share_token");
        obj.remove("download_count");
        let record: FileRecord = serde_json::from_value(row).expect("parse");
        assert!(record.share_token.is_none());
        assert_eq!(record.download_count, 0);
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = FileRecordPatch::download_count(4);
        assert_eq!(
            serde_json::to_value(&patch).expect("serialize"),
            json!({"download_count": 4})
        );
        let patch = FileRecordPatch::visibility(true);
        assert_eq!(
            serde_json::to_value(&patch).expect("serialize"),
            json!({"is_public": true})
        );
    }
}
