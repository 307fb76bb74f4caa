//! Events that mutate a user's local file listing.

use serde::{Deserialize, Serialize};

use sharedrop_core::types::FileId;

use super::model::FileRecord;

/// One entry of the listing event log.
///
/// Replaying a log from an empty listing reproduces both the list and its
/// aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum FileEvent {
    /// The listing was (re)loaded from the record store, newest first.
    Loaded(Vec<FileRecord>),
    /// An upload completed and its record was inserted.
    Created(FileRecord),
    /// A record was deleted.
    Deleted(FileId),
    /// A record was replaced by its updated version.
    Updated(FileRecord),
    /// The owner downloaded a file; its counter went up by one.
    Downloaded(FileId),
}
