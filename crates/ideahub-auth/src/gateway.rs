//! Bearer token validation for protected routes.

use std::sync::Arc;

use ideahub_core::error::AppError;
use ideahub_core::result::AppResult;

use crate::context::AuthContext;
use crate::token::issuer::TokenIssuer;

/// Turns an `Authorization` header value into a verified [`AuthContext`].
///
/// Validation is purely cryptographic: the session store is not consulted,
/// so a logged-out access token stays usable until its short TTL elapses.
/// That trade keeps every protected request free of store round-trips.
#[derive(Debug, Clone)]
pub struct AuthGateway {
    issuer: Arc<TokenIssuer>,
}

impl AuthGateway {
    /// Creates a gateway over the given issuer.
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }

    /// Authenticates a raw `Authorization` header value.
    pub fn authenticate(&self, header_value: &str) -> AppResult<AuthContext> {
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid token"))?;

        let claims = self.issuer.verify_access(token)?;
        Ok(AuthContext {
            subject_id: claims.sub,
            username: claims.username,
        })
    }
}
