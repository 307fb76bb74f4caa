//! In-process backend holding accounts, objects, and records in memory.
//!
//! Used for development runs and for exercising flows without a remote
//! service. Every call is recorded, and failures can be injected per
//! operation to drive error paths.

mod auth;
mod records;
mod storage;

use std::sync::Mutex;

use dashmap::DashMap;
use tracing::debug;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;

use self::auth::Account;
use self::storage::StoredBlob;

/// Remote operations the memory backend can record or fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `AuthProvider::current_user`
    CurrentUser,
    /// `AuthProvider::sign_in_with_password`
    SignIn,
    /// `AuthProvider::sign_up`
    SignUp,
    /// `AuthProvider::sign_out`
    SignOut,
    /// `AuthProvider::set_profile`
    SetProfile,
    /// `ObjectStore::upload`
    Upload,
    /// `ObjectStore::fetch`
    Fetch,
    /// `RecordStore::select`
    Select,
    /// `RecordStore::select_single`
    SelectSingle,
    /// `RecordStore::insert`
    Insert,
    /// `RecordStore::update`
    Update,
    /// `RecordStore::delete`
    Delete,
}

/// A failure waiting to be returned by a matching call.
#[derive(Debug, Clone)]
struct InjectedFailure {
    operation: Operation,
    /// Only calls whose subject ends with this text fail.
    subject_suffix: Option<String>,
    /// Remaining failures; `None` fails forever.
    remaining: Option<u32>,
    message: String,
}

/// In-memory implementation of every collaborator trait.
#[derive(Debug)]
pub struct MemoryBackend {
    /// Bucket name used in object URLs.
    bucket: String,
    /// Accounts keyed by email.
    accounts: DashMap<String, Account>,
    /// Email of the signed-in account.
    session: Mutex<Option<String>>,
    /// Uploaded objects keyed by storage key.
    objects: DashMap<String, StoredBlob>,
    /// Rows per collection, in insertion order.
    collections: DashMap<String, Vec<serde_json::Value>>,
    /// Pending injected failures.
    failures: Mutex<Vec<InjectedFailure>>,
    /// Every operation attempted, in order.
    calls: Mutex<Vec<Operation>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new("file-sharing")
    }
}

impl MemoryBackend {
    /// Create an empty backend whose object URLs name `bucket`.
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            accounts: DashMap::new(),
            session: Mutex::new(None),
            objects: DashMap::new(),
            collections: DashMap::new(),
            failures: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every subsequent `operation` call fail with `message`.
    pub fn fail_always(&self, operation: Operation, message: &str) {
        self.push_failure(operation, None, None, message);
    }

    /// Make the next `operation` call fail with `message`.
    pub fn fail_once(&self, operation: Operation, message: &str) {
        self.push_failure(operation, None, Some(1), message);
    }

    /// Make `operation` calls whose subject (object name, collection)
    /// ends with `suffix` fail with `message`.
    pub fn fail_matching(&self, operation: Operation, suffix: &str, message: &str) {
        self.push_failure(operation, Some(suffix.to_string()), None, message);
    }

    /// Remove every pending injected failure.
    pub fn clear_failures(&self) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Every operation attempted so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of operations attempted so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Snapshot of the rows in `collection`.
    pub fn rows(&self, collection: &str) -> Vec<serde_json::Value> {
        self.collections
            .get(collection)
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    fn push_failure(
        &self,
        operation: Operation,
        subject_suffix: Option<String>,
        remaining: Option<u32>,
        message: &str,
    ) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(InjectedFailure {
                operation,
                subject_suffix,
                remaining,
                message: message.to_string(),
            });
    }

    /// Record the call, then return an injected failure if one applies.
    fn enter(&self, operation: Operation, subject: &str) -> AppResult<()> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(operation);
        debug!(?operation, subject, "Memory backend call");

        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        let position = failures.iter().position(|f| {
            f.operation == operation
                && f.subject_suffix
                    .as_deref()
                    .is_none_or(|suffix| subject.ends_with(suffix))
        });

        let Some(index) = position else {
            return Ok(());
        };

        let message = failures[index].message.clone();
        if let Some(remaining) = failures[index].remaining.as_mut() {
            *remaining -= 1;
            if *remaining == 0 {
                failures.remove(index);
            }
        }
        Err(AppError::external(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_once_consumed() {
        let backend = MemoryBackend::default();
        backend.fail_once(Operation::Insert, "boom");
        assert!(backend.enter(Operation::Insert, "files").is_err());
        assert!(backend.enter(Operation::Insert, "files").is_ok());
        assert_eq!(backend.call_count(), 2);
    }

    #[test]
    fn test_fail_matching_only_hits_subject() {
        let backend = MemoryBackend::default();
        backend.fail_matching(Operation::Upload, "b.txt", "quota exceeded");
        assert!(backend.enter(Operation::Upload, "1700-a.txt").is_ok());
        let err = backend
            .enter(Operation::Upload, "1700-b.txt")
            .expect_err("must fail");
        assert_eq!(err.message, "quota exceeded");
    }

    #[test]
    fn test_clear_failures() {
        let backend = MemoryBackend::default();
        backend.fail_always(Operation::Select, "down");
        assert!(backend.enter(Operation::Select, "files").is_err());
        backend.clear_failures();
        assert!(backend.enter(Operation::Select, "files").is_ok());
        assert_eq!(
            backend.calls(),
            vec![Operation::Select, Operation::Select]
        );
    }
}
