//! Authentication collaborator trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::identity::{AuthSession, Credentials, CurrentUser, Profile, ProfileUpdate};

/// Trait for the remote authentication service.
///
/// Implementations keep whatever session material (bearer tokens) the
/// service issues; callers only see identities.
#[async_trait]
pub trait AuthProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve the identity of the current session. `Ok(None)` means there
    /// is no session.
    async fn current_user(&self) -> AppResult<Option<CurrentUser>>;

    /// Sign in with an email/password pair.
    async fn sign_in_with_password(&self, credentials: &Credentials) -> AppResult<AuthSession>;

    /// Register a new account and sign it in.
    async fn sign_up(&self, credentials: &Credentials) -> AppResult<AuthSession>;

    /// End the current session.
    async fn sign_out(&self) -> AppResult<()>;

    /// Apply a partial profile update and return the resulting profile.
    async fn set_profile(&self, update: &ProfileUpdate) -> AppResult<Profile>;
}
