//! Event-sourced file listing.
//!
//! Every change to the listing is a [`FileEvent`]; [`FileLedger::apply`]
//! folds events into the list and its aggregates. Replaying the recorded
//! events from an empty ledger reproduces the same state.

use serde::{Deserialize, Serialize};

use sharedrop_core::types::FileId;
use sharedrop_entity::{FileEvent, FileRecord};

/// Aggregates over the listed files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    /// Number of files.
    pub total_files: u64,
    /// Sum of file sizes in bytes.
    pub total_size: u64,
    /// Sum of download counters.
    pub total_downloads: u64,
}

impl FileStats {
    /// Aggregate a full set of files.
    pub fn from_files(files: &[FileRecord]) -> Self {
        files.iter().fold(Self::default(), |acc, f| Self {
            total_files: acc.total_files + 1,
            total_size: acc.total_size + f.size,
            total_downloads: acc.total_downloads + f.download_count,
        })
    }
}

/// Files newest first, plus aggregates and the events that produced them.
#[derive(Debug, Clone, Default)]
pub struct FileLedger {
    files: Vec<FileRecord>,
    stats: FileStats,
    events: Vec<FileEvent>,
}

impl FileLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger by applying `events` in order.
    pub fn replay(events: impl IntoIterator<Item = FileEvent>) -> Self {
        let mut ledger = Self::new();
        for event in events {
            ledger.apply(event);
        }
        ledger
    }

    /// Listed files, newest first.
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// Current aggregates.
    pub fn stats(&self) -> FileStats {
        self.stats
    }

    /// Events applied so far.
    pub fn events(&self) -> &[FileEvent] {
        &self.events
    }

    /// Look up a listed file.
    pub fn get(&self, id: &FileId) -> Option<&FileRecord> {
        self.files.iter().find(|f| &f.id == id)
    }

    fn position(&self, id: &FileId) -> Option<usize> {
        self.files.iter().position(|f| &f.id == id)
    }

    /// Fold one event into the listing.
    pub fn apply(&mut self, event: FileEvent) {
        match &event {
            FileEvent::Loaded(files) => {
                self.stats = FileStats::from_files(files);
                self.files = files.clone();
            }
            FileEvent::Created(file) => {
                self.stats.total_files += 1;
                self.stats.total_size += file.size;
                self.files.insert(0, file.clone());
            }
            FileEvent::Deleted(id) => {
                if let Some(index) = self.position(id) {
                    let removed = self.files.remove(index);
                    self.stats.total_files = self.stats.total_files.saturating_sub(1);
                    self.stats.total_size = self.stats.total_size.saturating_sub(removed.size);
                    self.stats.total_downloads = self
                        .stats
                        .total_downloads
                        .saturating_sub(removed.download_count);
                }
            }
            FileEvent::Updated(file) => {
                if let Some(index) = self.position(&file.id) {
                    self.files[index] = file.clone();
                }
            }
            FileEvent::Downloaded(id) => {
                if let Some(index) = self.position(id) {
                    self.files[index].download_count += 1;
                    self.stats.total_downloads += 1;
                }
            }
        }
        self.events.push(event);
    }
}
