//! Auth handlers — register, login, Google sign-in, refresh, logout.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use ideahub_core::error::AppError;

use crate::cookies;
use crate::dto::request::{GoogleLoginRequest, LoginRequest, RegisterRequest, validate_request};
use crate::dto::response::{AuthResponse, RefreshResponse};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    req.username = req.username.trim().to_string();
    req.email = req.email.trim().to_string();
    validate_request(&req)?;

    let session = state
        .session_manager
        .register(&req.username, &req.email, &req.password)
        .await?;

    let jar = cookies::with_refresh_cookie(jar, session.tokens.refresh_token.clone());
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            access_token: session.tokens.access_token,
            user: (&session.account).into(),
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    req.username = req.username.trim().to_string();
    validate_request(&req)?;

    let session = state
        .session_manager
        .login(&req.username, &req.password)
        .await?;

    let jar = cookies::with_refresh_cookie(jar, session.tokens.refresh_token.clone());
    Ok((
        jar,
        Json(AuthResponse {
            access_token: session.tokens.access_token,
            user: (&session.account).into(),
        }),
    ))
}

/// POST /api/auth/google
pub async fn google(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<GoogleLoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    validate_request(&req)?;

    let session = state.session_manager.login_google(&req.id_token).await?;

    let jar = cookies::with_refresh_cookie(jar, session.tokens.refresh_token.clone());
    Ok((
        jar,
        Json(AuthResponse {
            access_token: session.tokens.access_token,
            user: (&session.account).into(),
        }),
    ))
}

/// POST /api/auth/refresh
///
/// The credential arrives only in the scoped cookie. On success the
/// cookie is replaced with the rotated token; on any failure the caller
/// gets an undifferentiated 401.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<RefreshResponse>), AppError> {
    let raw = cookies::refresh_cookie_value(&jar)
        .ok_or_else(|| AppError::unauthorized("Missing refresh cookie"))?;

    let (tokens, _account) = state.session_manager.refresh(&raw).await?;

    let jar = cookies::with_refresh_cookie(jar, tokens.refresh_token.clone());
    Ok((
        jar,
        Json(RefreshResponse {
            access_token: tokens.access_token,
        }),
    ))
}

/// POST /api/auth/logout
///
/// Always 204: revocation is best-effort and must not leak whether the
/// presented cookie was valid.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (StatusCode, CookieJar) {
    let raw = cookies::refresh_cookie_value(&jar);
    state.session_manager.logout(raw.as_deref()).await;
    (StatusCode::NO_CONTENT, cookies::clear_refresh_cookie(jar))
}
