//! Convenience result type alias.

use crate::error::AppError;

/// A specialized `Result` type for attendance operations.
///
/// Every crate uses this alias instead of spelling out
/// `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;
