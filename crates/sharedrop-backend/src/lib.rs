//! # sharedrop-backend
//!
//! Implementations of the remote collaborator traits for ShareDrop:
//!
//! - **http**: the remote BaaS reached over its REST contract with
//!   [reqwest](https://crates.io/crates/reqwest)
//! - **memory**: an in-process backend holding accounts, objects, and
//!   records in memory, with failure injection for exercising error paths
//!
//! The implementation is selected at runtime from configuration.

#[cfg(feature = "http")]
pub mod http;
pub mod manager;
#[cfg(feature = "memory")]
pub mod memory;
pub mod repository;

pub use manager::Backend;
pub use repository::FileRepository;
