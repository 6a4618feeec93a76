//! Result alias used across all crates.

use crate::error::AppError;

/// Convenience alias for results carrying [`AppError`].
pub type AppResult<T> = Result<T, AppError>;
