//! Token signing and identity-provider configuration.

use serde::{Deserialize, Serialize};

/// Token signing configuration.
///
/// Access and refresh tokens are signed with distinct secrets so a leaked
/// access secret cannot be used to mint long-lived credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for access token signing (HMAC-SHA256).
    #[serde(default = "default_access_secret")]
    pub access_secret: String,
    /// Secret key for refresh token signing (HMAC-SHA256).
    #[serde(default = "default_refresh_secret")]
    pub refresh_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: default_access_secret(),
            refresh_secret: default_refresh_secret(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
        }
    }
}

/// Google identity-provider configuration.
///
/// Sign-in with Google is disabled when `client_id` is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// OAuth client ID expected in the `aud` claim of ID tokens.
    #[serde(default)]
    pub client_id: String,
    /// JWKS endpoint publishing Google's current signing keys.
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
    /// Timeout for JWKS fetches in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            jwks_url: default_jwks_url(),
            fetch_timeout_seconds: default_fetch_timeout(),
        }
    }
}

impl GoogleConfig {
    /// Whether Google sign-in is configured at all.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty()
    }
}

fn default_access_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_refresh_secret() -> String {
    "CHANGE_ME_TOO_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    14
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/oauth2/v3/certs".to_string()
}

fn default_fetch_timeout() -> u64 {
    10
}
