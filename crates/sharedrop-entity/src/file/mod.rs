//! File domain entities.

pub mod event;
pub mod kind;
pub mod model;
pub mod size;

pub use event::FileEvent;
pub use kind::FileKind;
pub use model::{FileRecord, FileRecordPatch, NewFileRecord};
pub use size::format_file_size;
