//! Authentication failure causes
//!
//! Every variant is reported to clients as the same 401 with
//! [`AUTH_FAILED_MESSAGE`]. The variant itself is only visible to logs and tests.

/// Message returned to clients for every authentication failure
pub const AUTH_FAILED_MESSAGE: &str = "Invalid or expired credentials";

/// Internal cause of an authentication failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// Unknown email or wrong password
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No credential was presented
    #[error("missing credential")]
    MissingToken,

    /// Bad signature, malformed token, wrong token type, or past `exp`
    #[error("token invalid or expired")]
    InvalidOrExpired,

    /// No refresh session is recorded for the presented session id
    #[error("refresh session not registered")]
    NotRegistered,

    /// The refresh session was revoked
    #[error("refresh session revoked")]
    Revoked,

    /// The presented token is not the one recorded for its session
    #[error("refresh token hash mismatch")]
    HashMismatch,

    /// The recorded session is past its expiry
    #[error("refresh session expired")]
    Expired,

    /// The token version snapshot no longer matches the user
    #[error("token version is stale")]
    StaleVersion,

    /// Generic rejection
    #[error("unauthorized")]
    Unauthorized,
}

impl AuthFailure {
    /// Stable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidOrExpired => "INVALID_OR_EXPIRED",
            Self::NotRegistered => "NOT_REGISTERED",
            Self::Revoked => "REVOKED",
            Self::HashMismatch => "HASH_MISMATCH",
            Self::Expired => "EXPIRED",
            Self::StaleVersion => "STALE_VERSION",
            Self::Unauthorized => "UNAUTHORIZED",
        }
    }
}
