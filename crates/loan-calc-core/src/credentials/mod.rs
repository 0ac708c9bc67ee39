//! Username/password gate in front of the dashboard.
//!
//! Credentials live behind the [`CredentialStore`] trait; only a per-user
//! salt and a SHA-256 digest are ever stored. A successful login yields an
//! explicit [`Session`] that request handlers receive by reference.

pub mod hashing;
pub mod session;
pub mod store;

use thiserror::Error;

use hashing::PasswordDigest;
pub use session::Session;
pub use store::{CredentialRecord, CredentialStore, InMemoryCredentialStore, JsonFileCredentialStore};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Registers users and checks passwords against a [`CredentialStore`].
pub struct Authenticator<S: CredentialStore> {
    store: S,
}

impl<S: CredentialStore> Authenticator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a user. Fails with `UsernameTaken` if the name exists.
    pub fn register(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        let username = normalize_username(username)?;
        if password.is_empty() {
            return Err(CredentialError::InvalidInput {
                field: "password".into(),
                reason: "Password cannot be empty".into(),
            });
        }

        let digest = PasswordDigest::new(password);
        let record = CredentialRecord {
            username: username.clone(),
            salt: digest.salt_hex(),
            password_hash: digest.hash_hex(),
        };

        if self.store.insert_if_absent(record)? {
            log::info!("registered user '{username}'");
            Ok(())
        } else {
            Err(CredentialError::UsernameTaken(username))
        }
    }

    /// True when the username exists and the password matches.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let username = username.trim();
        if username.is_empty() {
            return Ok(false);
        }

        let Some(record) = self.store.get(username)? else {
            log::warn!("authentication failed: unknown user '{username}'");
            return Ok(false);
        };

        let ok = PasswordDigest::from_hex(&record.salt, &record.password_hash)
            .map(|d| d.verify(password))
            .unwrap_or(false);
        if !ok {
            log::warn!("authentication failed for user '{username}'");
        }
        Ok(ok)
    }

    /// Authenticate and open a session scoped to this user.
    pub fn login(&self, username: &str, password: &str) -> Result<Session, CredentialError> {
        if self.authenticate(username, password)? {
            Ok(Session::open(username.trim()))
        } else {
            Err(CredentialError::InvalidCredentials)
        }
    }
}

fn normalize_username(username: &str) -> Result<String, CredentialError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(CredentialError::InvalidInput {
            field: "username".into(),
            reason: "Username cannot be empty".into(),
        });
    }
    Ok(trimmed.to_string())
}
