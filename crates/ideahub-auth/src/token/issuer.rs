//! Token creation and verification with configurable signing and TTL.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use ideahub_core::config::auth::AuthConfig;
use ideahub_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Uniform rejection message for every verification failure.
///
/// Signature mismatch, malformed payload, wrong token type, and expiry
/// must all be indistinguishable to the caller.
const TOKEN_REJECTED: &str = "Invalid token";

/// Mints and verifies signed access/refresh tokens.
///
/// Holds immutable signing configuration injected at construction; the
/// two token kinds use distinct secrets so one cannot stand in for the
/// other. Stateless: issuing and verifying have no side effects.
#[derive(Clone)]
pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_minutes: i64,
    refresh_ttl_days: i64,
    validation: Validation,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

/// An access + refresh token pair minted together.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: chrono::DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: chrono::DateTime<Utc>,
}

impl TokenIssuer {
    /// Creates a new issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl_minutes: config.access_ttl_minutes as i64,
            refresh_ttl_days: config.refresh_ttl_days as i64,
            validation,
        }
    }

    /// Mints a short-lived access token for the given account.
    pub fn issue_access(&self, subject_id: Uuid, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::minutes(self.access_ttl_minutes);
        let claims = Claims {
            sub: subject_id,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
            token_type: TokenType::Access,
        };
        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))
    }

    /// Mints a long-lived refresh token for the given account.
    pub fn issue_refresh(&self, subject_id: Uuid, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::days(self.refresh_ttl_days);
        let claims = Claims {
            sub: subject_id,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
            token_type: TokenType::Refresh,
        };
        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|e| AppError::internal(format!("Failed to encode refresh token: {e}")))
    }

    /// Mints a matched access + refresh pair.
    pub fn issue_pair(&self, subject_id: Uuid, username: &str) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        Ok(TokenPair {
            access_token: self.issue_access(subject_id, username)?,
            refresh_token: self.issue_refresh(subject_id, username)?,
            access_expires_at: now + chrono::Duration::minutes(self.access_ttl_minutes),
            refresh_expires_at: now + chrono::Duration::days(self.refresh_ttl_days),
        })
    }

    /// Verifies an access token and returns its claims.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, &self.access_decoding, TokenType::Access)
    }

    /// Verifies a refresh token and returns its claims.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AppError> {
        self.verify(token, &self.refresh_decoding, TokenType::Refresh)
    }

    fn verify(
        &self,
        token: &str,
        key: &DecodingKey,
        expected: TokenType,
    ) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, key, &self.validation)
            .map_err(|_| AppError::unauthorized(TOKEN_REJECTED))?;

        if data.claims.token_type != expected {
            return Err(AppError::unauthorized(TOKEN_REJECTED));
        }

        Ok(data.claims)
    }

    /// Computes the SHA-256 hex fingerprint of a token.
    ///
    /// Deterministic and one-way; the server persists only this value for
    /// refresh-list membership testing, never the raw token.
    pub fn fingerprint(&self, token: &str) -> String {
        let digest = Sha256::digest(token.as_bytes());
        hex::encode(digest)
    }
}
