//! Share domain value objects.

pub mod link;

pub use link::{ShareLink, parse_share_reference};
