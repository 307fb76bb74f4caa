//! Identity value objects provided by the auth collaborator.
//!
//! ShareDrop never interprets these beyond display; they are carried as
//! returned by the remote service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Email address used to sign in.
    pub email: String,
    /// Role assigned by the auth service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the email address has been verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    /// When the account was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the account was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Optional display metadata attached to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// The user this profile belongs to.
    pub id: UserId,
    /// Nickname shown instead of the email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Free-text biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New nickname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// New biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.bio.is_none() && self.avatar_url.is_none()
    }
}

/// Email/password pair for sign-in and sign-up.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Plain-text password, sent only to the auth collaborator.
    pub password: String,
}

impl Credentials {
    /// Create a credentials pair.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Identity resolved for an existing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The signed-in user.
    pub user: User,
    /// The user's profile, when one exists.
    #[serde(default)]
    pub profile: Option<Profile>,
}

/// Result of a successful sign-in or sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// The authenticated user.
    pub user: User,
    /// Bearer token for subsequent calls, when the service issues one.
    #[serde(default)]
    pub access_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_masks_password() {
        let creds = Credentials::new("a@example.com", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("a@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_user_accepts_minimal_payload() {
        let user: User =
            serde_json::from_str(r#"{"id":"u1","email":"a@example.com"}"#).expect("parse");
        assert_eq!(user.id.as_str(), "u1");
        assert!(user.role.is_none());
    }

    #[test]
    fn test_profile_update_skips_absent_fields() {
        let update = ProfileUpdate {
            nickname: Some("neo".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).expect("serialize");
        assert_eq!(json, serde_json::json!({"nickname": "neo"}));
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }
}
