//! Convenience result type alias for Troika.

use crate::error::AppError;

/// A specialized `Result` type for Troika operations.
pub type AppResult<T> = Result<T, AppError>;
