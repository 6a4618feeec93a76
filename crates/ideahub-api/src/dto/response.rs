//! Response DTOs.
//!
//! Payload shapes and key casing follow the client contract: plain JSON
//! objects with camelCase keys.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ideahub_entity::account::Account;

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Account ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Profile picture URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<&Account> for UserResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            avatar_url: account.avatar_url.clone(),
        }
    }
}

/// Successful register/login/Google sign-in response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Short-lived access token for the Authorization header.
    pub access_token: String,
    /// The authenticated user.
    pub user: UserResponse,
}

/// Successful refresh response. The rotated refresh token travels only
/// in the cookie, never in the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Fresh access token.
    pub access_token: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}
