//! # sharedrop-entity
//!
//! Domain entity models for ShareDrop. Every struct in this crate is either
//! a row of the remote file collection or a value object derived from one.
//! All entities derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod file;
pub mod share;

pub use file::{FileEvent, FileKind, FileRecord, FileRecordPatch, NewFileRecord, format_file_size};
pub use share::ShareLink;
