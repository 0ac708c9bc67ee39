use chrono::{DateTime, Utc};
use serde::Serialize;

/// An authenticated user's session. Only [`Authenticator::login`] creates
/// one, so holding a `&Session` is proof of login.
///
/// [`Authenticator::login`]: super::Authenticator::login
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    username: String,
    authenticated_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn open(username: &str) -> Self {
        Self {
            username: username.to_string(),
            authenticated_at: Utc::now(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }

    /// End the session.
    pub fn logout(self) {
        log::info!("user '{}' logged out", self.username);
    }
}
