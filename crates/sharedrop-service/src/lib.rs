//! # sharedrop-service
//!
//! Client-side flows for ShareDrop. Each flow orchestrates the remote
//! collaborators from `sharedrop-backend` and reports outcomes to the user
//! through a [`NoticeSink`](sharedrop_core::traits::NoticeSink).
//!
//! Flows follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references, and the [`SessionService`] is
//! shared by every flow that needs the current identity.

pub mod listing;
pub mod notice;
pub mod session;
pub mod share;
pub mod upload;

pub use listing::{FileLedger, FileStats, ListingService};
pub use notice::NoticeLog;
pub use session::{SessionPhase, SessionService, SessionSnapshot};
pub use share::{LinkService, SharePage, ShareResolver, ShareState};
pub use upload::{LocalFile, UploadReport, UploadService};
