//! Anonymous access to shared files.

pub mod link;
pub mod resolver;

pub use link::LinkService;
pub use resolver::{SharePage, ShareResolver, ShareState};
