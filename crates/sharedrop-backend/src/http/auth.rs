//! [`AuthProvider`] over the REST contract.

use async_trait::async_trait;
use reqwest::Method;
use tracing::{info, warn};

use sharedrop_core::error::ErrorKind;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::AuthProvider;
use sharedrop_core::types::{AuthSession, Credentials, CurrentUser, Profile, ProfileUpdate};

use super::HttpBackend;

impl HttpBackend {
    /// Post credentials to an auth endpoint and keep the issued token.
    async fn authenticate(&self, segments: &[&str], credentials: &Credentials) -> AppResult<AuthSession> {
        let url = self.endpoint(segments)?;
        let session: AuthSession = self
            .send_json(self.request(Method::POST, url).json(credentials))
            .await?;

        if session.access_token.is_some() {
            self.set_access_token(session.access_token.clone());
        }

        info!(user_id = %session.user.id, "Authenticated");
        Ok(session)
    }
}

#[async_trait]
impl AuthProvider for HttpBackend {
    async fn current_user(&self) -> AppResult<Option<CurrentUser>> {
        let url = self.endpoint(&["api", "auth", "sessions", "current"])?;
        match self
            .send_json::<CurrentUser>(self.request(Method::GET, url))
            .await
        {
            Ok(current) => Ok(Some(current)),
            Err(e) if e.kind == ErrorKind::Authentication => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> AppResult<AuthSession> {
        self.authenticate(&["api", "auth", "sessions"], credentials).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> AppResult<AuthSession> {
        self.authenticate(&["api", "auth", "users"], credentials).await
    }

    async fn sign_out(&self) -> AppResult<()> {
        let url = self.endpoint(&["api", "auth", "logout"])?;
        let result = self.send(self.request(Method::POST, url)).await;
        // the local token is dropped even when the remote call fails
        self.set_access_token(None);
        if let Err(e) = &result {
            warn!(error = %e, "Remote sign-out failed");
        }
        result.map(|_| ())
    }

    async fn set_profile(&self, update: &ProfileUpdate) -> AppResult<Profile> {
        let url = self.endpoint(&["api", "auth", "profiles", "current"])?;
        self.send_json(self.request(Method::PATCH, url).json(update)).await
    }
}
