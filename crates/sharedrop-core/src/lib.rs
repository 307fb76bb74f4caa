//! # sharedrop-core
//!
//! Core crate for ShareDrop. Contains the collaborator traits (auth,
//! object storage, record store, notices, clipboard), configuration
//! schemas, typed identifiers, identity value objects, record query
//! types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ShareDrop crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
