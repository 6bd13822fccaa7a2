//! SQLx error translation shared by the repositories

use barkeep_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Any failure the caller can't act on becomes `DatabaseError`
pub fn map_db_error(e: SqlxError) -> DomainError {
    tracing::error!(error = %e, "Database query failed");
    DomainError::DatabaseError(e.to_string())
}

/// Like [`map_db_error`], but a unique-constraint violation becomes `conflict`
pub fn map_unique_violation(e: SqlxError, conflict: impl FnOnce() -> DomainError) -> DomainError {
    match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => conflict(),
        _ => map_db_error(e),
    }
}
