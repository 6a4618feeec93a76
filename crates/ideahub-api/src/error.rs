//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use ideahub_core::error::{AppError, ErrorKind, FieldError};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Human-readable message.
    pub message: String,
    /// Itemized field errors (validation failures only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, self.message.clone()),
            // One uniform body for every credential failure: expired,
            // forged, revoked, and consumed tokens must read the same.
            ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, self.message.clone()),
            ErrorKind::Conflict => (StatusCode::CONFLICT, self.message.clone()),
            ErrorKind::UpstreamIdentity => {
                tracing::warn!(error = %self.message, "Identity provider failure");
                (StatusCode::BAD_GATEWAY, self.message.clone())
            }
            ErrorKind::Configuration => {
                tracing::error!(error = %self.message, "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.message.clone())
            }
            ErrorKind::Database | ErrorKind::Internal => {
                tracing::error!(error = %self.message, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let errors = if self.fields.is_empty() {
            None
        } else {
            Some(self.fields)
        };

        let body = ApiErrorResponse { message, errors };
        (status, Json(body)).into_response()
    }
}
