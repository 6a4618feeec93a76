//! `CurrentUser` extractor — pulls the bearer token from the
//! Authorization header, validates it, and injects the verified identity.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use ideahub_auth::context::AuthContext;
use ideahub_core::error::AppError;

use crate::state::AppState;

/// Extracted authenticated identity available to handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthContext);

impl std::ops::Deref for CurrentUser {
    type Target = AuthContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let context = state.auth_gateway.authenticate(header_value)?;
        Ok(CurrentUser(context))
    }
}
