//! Error types shared across the workspace

mod app_error;
mod auth_failure;
mod validation;

pub use app_error::{AppError, AppResult, ErrorResponse};
pub use auth_failure::{AuthFailure, AUTH_FAILED_MESSAGE};
pub use validation::{FieldViolation, ValidationIssues};
