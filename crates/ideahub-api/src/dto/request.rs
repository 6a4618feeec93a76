//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use ideahub_core::error::{AppError, FieldError};

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 1, max = 24, message = "Username must be 1-24 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Google sign-in request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    /// The ID token issued by Google to the client.
    #[validate(length(min = 1, message = "idToken is required"))]
    pub id_token: String,
}

/// Profile update request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New username, when changing it.
    #[validate(length(min = 1, max = 24, message = "Username must be 1-24 characters"))]
    pub username: Option<String>,
}

/// Runs derive-based validation, itemizing failures per field.
pub fn validate_request<T: Validate>(request: &T) -> Result<(), AppError> {
    let Err(errors) = request.validate() else {
        return Ok(());
    };

    let mut fields = Vec::new();
    for (field, entries) in errors.field_errors() {
        for entry in entries.iter() {
            fields.push(FieldError {
                field: field.to_string(),
                message: entry
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid")),
            });
        }
    }
    fields.sort_by(|a, b| a.field.cmp(&b.field));

    Err(AppError::validation_fields("Validation error", fields))
}
