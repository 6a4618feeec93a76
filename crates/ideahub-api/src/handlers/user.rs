//! User profile handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use ideahub_core::error::AppError;

use crate::dto::request::{UpdateProfileRequest, validate_request};
use crate::dto::response::UserResponse;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let account = state
        .accounts
        .find_by_id(user.subject_id)
        .await?
        .ok_or_else(|| AppError::not_found("Not found"))?;

    Ok(Json((&account).into()))
}

/// PATCH /api/users/me
///
/// Username changes re-check global uniqueness; renaming to a name held
/// by another account is a conflict.
pub async fn update_me(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(mut req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.username = req.username.map(|u| u.trim().to_string());
    validate_request(&req)?;

    let account = match req.username.as_deref() {
        Some(username) => {
            state
                .accounts
                .update_username(user.subject_id, username)
                .await?
        }
        None => state
            .accounts
            .find_by_id(user.subject_id)
            .await?
            .ok_or_else(|| AppError::not_found("Not found"))?,
    };

    Ok(Json((&account).into()))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let account = state
        .accounts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Not found"))?;

    Ok(Json((&account).into()))
}
