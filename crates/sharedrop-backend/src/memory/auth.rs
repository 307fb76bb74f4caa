//! [`AuthProvider`] over in-memory accounts.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::AuthProvider;
use sharedrop_core::types::{
    AuthSession, Credentials, CurrentUser, Profile, ProfileUpdate, User, UserId,
};

use super::{MemoryBackend, Operation};

/// A registered account.
#[derive(Debug, Clone)]
pub(super) struct Account {
    password: String,
    user: User,
    profile: Option<Profile>,
}

impl MemoryBackend {
    /// Register an account without signing it in and return its user.
    pub fn register_user(&self, email: &str, password: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: UserId::new(Uuid::new_v4().to_string()),
            email: email.to_string(),
            role: Some("authenticated".to_string()),
            name: None,
            email_verified: Some(false),
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: user.clone(),
                profile: None,
            },
        );
        user
    }

    /// Sign an already registered account in without going through the
    /// call log.
    pub fn force_session(&self, email: &str) {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(email.to_string());
    }

    fn open_session(&self, user: User) -> AuthSession {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(user.email.clone());
        info!(user_id = %user.id, "Authenticated");
        AuthSession {
            user,
            access_token: Some(format!("mem-{}", Uuid::new_v4())),
        }
    }

    fn session_email(&self) -> Option<String> {
        self.session
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn current_user(&self) -> AppResult<Option<CurrentUser>> {
        self.enter(Operation::CurrentUser, "")?;
        let Some(email) = self.session_email() else {
            return Ok(None);
        };
        Ok(self.accounts.get(&email).map(|account| CurrentUser {
            user: account.user.clone(),
            profile: account.profile.clone(),
        }))
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> AppResult<AuthSession> {
        self.enter(Operation::SignIn, &credentials.email)?;
        let user = match self.accounts.get(&credentials.email) {
            Some(account) if account.password == credentials.password => account.user.clone(),
            _ => return Err(AppError::authentication("Invalid login credentials")),
        };
        Ok(self.open_session(user))
    }

    async fn sign_up(&self, credentials: &Credentials) -> AppResult<AuthSession> {
        self.enter(Operation::SignUp, &credentials.email)?;
        if self.accounts.contains_key(&credentials.email) {
            return Err(AppError::external("User already registered"));
        }
        let user = self.register_user(&credentials.email, &credentials.password);
        Ok(self.open_session(user))
    }

    async fn sign_out(&self) -> AppResult<()> {
        self.enter(Operation::SignOut, "")?;
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }

    async fn set_profile(&self, update: &ProfileUpdate) -> AppResult<Profile> {
        self.enter(Operation::SetProfile, "")?;
        let email = self
            .session_email()
            .ok_or_else(|| AppError::authentication("Not authenticated"))?;
        let mut account = self
            .accounts
            .get_mut(&email)
            .ok_or_else(|| AppError::authentication("Not authenticated"))?;

        let id = account.user.id.clone();
        let profile = account.profile.get_or_insert_with(|| Profile {
            id,
            nickname: None,
            bio: None,
            avatar_url: None,
        });
        if let Some(nickname) = &update.nickname {
            profile.nickname = Some(nickname.clone());
        }
        if let Some(bio) = &update.bio {
            profile.bio = Some(bio.clone());
        }
        if let Some(avatar_url) = &update.avatar_url {
            profile.avatar_url = Some(avatar_url.clone());
        }
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use sharedrop_core::error::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn test_sign_up_then_current_user() {
        let backend = MemoryBackend::default();
        let session = backend
            .sign_up(&Credentials::new("a@example.com", "pw"))
            .await
            .expect("sign up");
        assert!(
            session
                .access_token
                .as_deref()
                .is_some_and(|t| t.starts_with("mem-"))
        );

        let current = backend.current_user().await.expect("current").expect("some");
        assert_eq!(current.user.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_sign_in_rejects_wrong_password() {
        let backend = MemoryBackend::default();
        backend.register_user("a@example.com", "pw");
        let err = backend
            .sign_in_with_password(&Credentials::new("a@example.com", "nope"))
            .await
            .expect_err("must fail");
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_duplicate_sign_up() {
        let backend = MemoryBackend::default();
        backend.register_user("a@example.com", "pw");
        let err = backend
            .sign_up(&Credentials::new("a@example.com", "pw"))
            .await
            .expect_err("must fail");
        assert_eq!(err.message, "User already registered");
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let backend = MemoryBackend::default();
        backend.register_user("a@example.com", "pw");
        backend.force_session("a@example.com");
        backend.sign_out().await.expect("sign out");
        assert!(backend.current_user().await.expect("current").is_none());
    }

    #[tokio::test]
    async fn test_set_profile_merges_fields() {
        let backend = MemoryBackend::default();
        backend.register_user("a@example.com", "pw");
        backend.force_session("a@example.com");

        backend
            .set_profile(&ProfileUpdate {
                nickname: Some("neo".into()),
                ..Default::default()
            })
            .await
            .expect("first");
        let profile = backend
            .set_profile(&ProfileUpdate {
                bio: Some("hello".into()),
                ..Default::default()
            })
            .await
            .expect("second");

        assert_eq!(profile.nickname.as_deref(), Some("neo"));
        assert_eq!(profile.bio.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_set_profile_requires_session() {
        let backend = MemoryBackend::default();
        let err = backend
            .set_profile(&ProfileUpdate::default())
            .await
            .expect_err("must fail");
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
