//! The signed-in user's file listing and its aggregates.

pub mod ledger;
pub mod service;

pub use ledger::{FileLedger, FileStats};
pub use service::ListingService;
