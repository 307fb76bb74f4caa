//! Collaborator traits defined in `sharedrop-core` and implemented by other
//! crates.

pub mod auth;
pub mod clipboard;
pub mod notice;
pub mod records;
pub mod storage;

pub use auth::AuthProvider;
pub use clipboard::Clipboard;
pub use notice::{Notice, NoticeLevel, NoticeSink};
pub use records::RecordStore;
pub use storage::{ObjectStore, StoredObject};
