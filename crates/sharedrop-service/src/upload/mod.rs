//! Upload flow: store local files and record their metadata.

pub mod service;
pub mod source;

pub use service::{UploadReport, UploadService};
pub use source::LocalFile;
