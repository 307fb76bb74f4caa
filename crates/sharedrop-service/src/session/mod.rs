//! Session state: who is signed in, and the account operations.

pub mod service;
pub mod state;

pub use service::SessionService;
pub use state::{SessionPhase, SessionSnapshot};
