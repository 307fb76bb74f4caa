//! Session phases and the snapshot handed to consumers.

use serde::{Deserialize, Serialize};

use sharedrop_core::types::{Profile, User};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// The initial identity lookup has not completed.
    #[default]
    Unresolved,
    /// A user is signed in.
    Authenticated,
    /// Nobody is signed in.
    Anonymous,
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The signed-in user.
    pub user: Option<User>,
    /// The user's profile, when loaded.
    pub profile: Option<Profile>,
    /// True only while the initial identity lookup is in flight.
    pub loading: bool,
}

impl SessionSnapshot {
    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Name to greet the user with: the profile nickname, else the email.
    pub fn display_name(&self) -> Option<&str> {
        let user = self.user.as_ref()?;
        Some(
            self.profile
                .as_ref()
                .and_then(|p| p.nickname.as_deref())
                .unwrap_or(&user.email),
        )
    }
}

/// Mutable session state guarded by the service.
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionState {
    pub(crate) phase: SessionPhase,
    pub(crate) user: Option<User>,
    pub(crate) profile: Option<Profile>,
}

impl SessionState {
    pub(crate) fn authenticated(&mut self, user: User, profile: Option<Profile>) {
        self.phase = SessionPhase::Authenticated;
        self.user = Some(user);
        self.profile = profile;
    }

    pub(crate) fn anonymous(&mut self) {
        self.phase = SessionPhase::Anonymous;
        self.user = None;
        self.profile = None;
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            profile: self.profile.clone(),
            loading: self.phase == SessionPhase::Unresolved,
        }
    }
}
