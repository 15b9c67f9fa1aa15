//! REST API module.
//!
//! Handlers return their payload as JSON, or an [`crate::errors::AppError`] envelope.

mod auth;
mod sheet;

pub use auth::*;
pub use sheet::*;

use crate::errors::AppError;

/// Fallback for unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}
