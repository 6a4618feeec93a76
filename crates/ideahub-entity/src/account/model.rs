//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::provider::AuthProvider;

/// Upper bound on the per-account refresh fingerprint list.
///
/// One entry per live device session; the oldest entry is evicted when a
/// new login would exceed the bound.
pub const MAX_REFRESH_FINGERPRINTS: usize = 10;

/// Maximum username length in characters.
pub const MAX_USERNAME_LEN: usize = 24;

/// A registered account in the IdeaHub system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Unique login name, 1–24 characters.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Which provider created this account.
    pub provider: AuthProvider,
    /// Argon2 password hash. Absent for accounts that have only ever
    /// signed in with Google.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Google subject identifier once the account is linked.
    pub google_id: Option<String>,
    /// Profile picture URL.
    pub avatar_url: Option<String>,
    /// SHA-256 fingerprints of live refresh tokens, most-recent-first,
    /// never more than [`MAX_REFRESH_FINGERPRINTS`] entries.
    #[serde(skip_serializing)]
    pub refresh_token_hashes: Vec<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Check whether the account can authenticate with a password.
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Check whether a Google identity is attached.
    pub fn is_google_linked(&self) -> bool {
        self.google_id.is_some()
    }
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Desired username. Must be globally unique.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Originating provider.
    pub provider: AuthProvider,
    /// Pre-hashed password (local registrations only).
    pub password_hash: Option<String>,
    /// Google subject identifier (Google sign-ins only).
    pub google_id: Option<String>,
    /// Profile picture URL, if the provider supplied one.
    pub avatar_url: Option<String>,
}

impl CreateAccount {
    /// A local registration with username, email, and password hash.
    pub fn local(username: impl Into<String>, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            provider: AuthProvider::Local,
            password_hash: Some(password_hash.into()),
            google_id: None,
            avatar_url: None,
        }
    }

    /// An account created from verified Google claims.
    pub fn google(
        username: impl Into<String>,
        email: impl Into<String>,
        google_id: impl Into<String>,
        avatar_url: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            provider: AuthProvider::Google,
            password_hash: None,
            google_id: Some(google_id.into()),
            avatar_url,
        }
    }
}
