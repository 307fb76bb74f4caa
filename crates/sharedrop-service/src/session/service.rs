//! Session context shared by every flow.

use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};
use tracing::{info, warn};

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::AuthProvider;
use sharedrop_core::types::{AuthSession, Credentials, ProfileUpdate, User};

use super::state::{SessionPhase, SessionSnapshot, SessionState};

/// Keep the remote message, hide anything else behind a generic one.
fn user_facing(err: AppError) -> AppError {
    AppError::new(err.kind, err.user_message())
}

/// Holds the current identity and performs account operations.
///
/// The initial identity lookup runs at most once per service, no matter
/// how many times [`initialize`](Self::initialize) is awaited.
#[derive(Debug)]
pub struct SessionService {
    /// Authentication collaborator.
    auth: Arc<dyn AuthProvider>,
    /// Current state.
    state: RwLock<SessionState>,
    /// Completed once the initial lookup has run.
    resolved: OnceCell<()>,
}

impl SessionService {
    /// Creates a session in the unresolved phase.
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            auth,
            state: RwLock::new(SessionState::default()),
            resolved: OnceCell::new(),
        }
    }

    /// Resolves the current identity on first call; later calls return the
    /// current snapshot without contacting the collaborator.
    pub async fn initialize(&self) -> SessionSnapshot {
        self.resolved.get_or_init(|| self.resolve()).await;
        self.snapshot().await
    }

    async fn resolve(&self) {
        let result = self.auth.current_user().await;
        let mut state = self.state.write().await;
        match result {
            Ok(Some(current)) => {
                info!(user_id = %current.user.id, "Session resolved");
                state.authenticated(current.user, current.profile);
            }
            Ok(None) => {
                info!("No active session");
                state.anonymous();
            }
            Err(e) => {
                warn!(error = %e, "Failed to resolve session, continuing anonymously");
                state.anonymous();
            }
        }
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.snapshot()
    }

    /// Current phase.
    pub async fn phase(&self) -> SessionPhase {
        self.state.read().await.phase
    }

    /// The signed-in user, if any.
    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// Whether a user is signed in.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.user.is_some()
    }

    /// Signs in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<()> {
        let credentials = Credentials::new(email, password);
        let session = self
            .auth
            .sign_in_with_password(&credentials)
            .await
            .map_err(|e| {
                warn!(email, error = %e, "Sign-in failed");
                user_facing(e)
            })?;
        self.adopt(session).await;
        Ok(())
    }

    /// Registers a new account and signs it in.
    pub async fn sign_up(&self, email: &str, password: &str) -> AppResult<()> {
        let credentials = Credentials::new(email, password);
        let session = self.auth.sign_up(&credentials).await.map_err(|e| {
            warn!(email, error = %e, "Sign-up failed");
            user_facing(e)
        })?;
        self.adopt(session).await;
        Ok(())
    }

    /// The profile stays empty until [`refresh_profile`](Self::refresh_profile).
    async fn adopt(&self, session: AuthSession) {
        info!(user_id = %session.user.id, "Signed in");
        self.state.write().await.authenticated(session.user, None);
    }

    /// Signs out. Local state is cleared even when the remote call fails.
    pub async fn sign_out(&self) -> AppResult<()> {
        if let Err(e) = self.auth.sign_out().await {
            warn!(error = %e, "Remote sign-out failed");
        }
        self.state.write().await.anonymous();
        info!("Signed out");
        Ok(())
    }

    /// Applies a partial profile update and stores the returned profile.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<()> {
        let profile = self.auth.set_profile(update).await.map_err(|e| {
            warn!(error = %e, "Profile update failed");
            user_facing(e)
        })?;
        self.state.write().await.profile = Some(profile);
        Ok(())
    }

    /// Re-reads the current identity and its profile.
    pub async fn refresh_profile(&self) -> AppResult<()> {
        let current = self.auth.current_user().await.map_err(user_facing)?;
        let mut state = self.state.write().await;
        match current {
            Some(current) => state.authenticated(current.user, current.profile),
            None => state.anonymous(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sharedrop_backend::memory::{MemoryBackend, Operation};
    use sharedrop_core::error::{ErrorKind, UNEXPECTED_ERROR_MESSAGE};

    use super::*;

    fn session() -> (Arc<MemoryBackend>, SessionService) {
        let backend = Arc::new(MemoryBackend::default());
        let service = SessionService::new(backend.clone());
        (backend, service)
    }

    #[tokio::test]
    async fn test_initialize_runs_lookup_once() {
        let (backend, service) = session();
        backend.register_user("a@example.com", "pw");
        backend.force_session("a@example.com");

        assert!(service.snapshot().await.loading);
        let first = service.initialize().await;
        let second = service.initialize().await;

        assert!(!first.loading);
        assert_eq!(first, second);
        assert_eq!(service.phase().await, SessionPhase::Authenticated);
        let lookups = backend
            .calls()
            .into_iter()
            .filter(|op| *op == Operation::CurrentUser)
            .count();
        assert_eq!(lookups, 1);
    }

    #[tokio::test]
    async fn test_initialize_failure_is_anonymous() {
        let (backend, service) = session();
        backend.fail_always(Operation::CurrentUser, "service unavailable");
        let snapshot = service.initialize().await;
        assert!(!snapshot.loading);
        assert!(snapshot.user.is_none());
        assert_eq!(service.phase().await, SessionPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_sign_in_keeps_remote_message() {
        let (backend, service) = session();
        backend.register_user("a@example.com", "pw");
        let err = service
            .sign_in("a@example.com", "wrong")
            .await
            .expect_err("wrong password");
        assert_eq!(err.message, "Invalid login credentials");
        assert!(!service.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_sign_in_sets_user_without_profile() {
        let (backend, service) = session();
        backend.register_user("a@example.com", "pw");
        service.sign_in("a@example.com", "pw").await.expect("sign in");
        let snapshot = service.snapshot().await;
        assert_eq!(
            snapshot.user.map(|u| u.email).as_deref(),
            Some("a@example.com")
        );
        assert!(snapshot.profile.is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_even_on_remote_failure() {
        let (backend, service) = session();
        backend.register_user("a@example.com", "pw");
        service.sign_in("a@example.com", "pw").await.expect("sign in");
        backend.fail_once(Operation::SignOut, "network down");

        service.sign_out().await.expect("sign out");
        let snapshot = service.snapshot().await;
        assert!(snapshot.user.is_none());
        assert!(snapshot.profile.is_none());
    }

    #[tokio::test]
    async fn test_update_profile_replaces_profile() {
        let (_backend, service) = session();
        service.sign_up("a@example.com", "pw").await.expect("sign up");
        service
            .update_profile(&ProfileUpdate {
                nickname: Some("neo".into()),
                ..Default::default()
            })
            .await
            .expect("update");
        let profile = service.snapshot().await.profile.expect("profile");
        assert_eq!(profile.nickname.as_deref(), Some("neo"));
    }

    #[tokio::test]
    async fn test_refresh_profile_loads_profile() {
        let (backend, service) = session();
        service.sign_up("a@example.com", "pw").await.expect("sign up");
        backend
            .set_profile(&ProfileUpdate {
                bio: Some("hi".into()),
                ..Default::default()
            })
            .await
            .expect("remote profile");

        assert!(service.snapshot().await.profile.is_none());
        service.refresh_profile().await.expect("refresh");
        let profile = service.snapshot().await.profile.expect("profile");
        assert_eq!(profile.bio.as_deref(), Some("hi"));
    }

    #[test]
    fn test_user_facing_hides_internal_detail() {
        let err = user_facing(AppError::internal("mutex poisoned"));
        assert_eq!(err.message, UNEXPECTED_ERROR_MESSAGE);

        let err = user_facing(AppError::external("Email not confirmed"));
        assert_eq!(err.message, "Email not confirmed");
    }

    #[test]
    fn test_user_facing_keeps_not_found_message() {
        let err = user_facing(AppError::not_found("User not found"));
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "User not found");
    }
}
