//! Core type definitions used across the ShareDrop workspace.

pub mod id;
pub mod identity;
pub mod query;

pub use id::*;
pub use identity::{AuthSession, Credentials, CurrentUser, Profile, ProfileUpdate, User};
pub use query::{Filter, RecordQuery, SortDirection, SortField};
