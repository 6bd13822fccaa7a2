//! Password hashing and verification utilities
//!
//! Uses Argon2id for password hashing. Login against an unknown email still
//! performs one Argon2 verification so both failure paths cost the same.

use std::sync::OnceLock;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::{AppError, AuthFailure};

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a PHC-formatted hash
///
/// # Errors
/// Returns an internal error if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Password checks used by the session service
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash a new password for storage
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_password(password)
    }

    /// Check `password` against a stored hash
    ///
    /// # Errors
    /// Returns `AuthFailure::InvalidCredentials` if the password doesn't match
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), AppError> {
        if verify_password(password, hash)? {
            Ok(())
        } else {
            Err(AppError::auth(AuthFailure::InvalidCredentials))
        }
    }

    /// Spend one verification on a throwaway hash and fail
    ///
    /// Called when the account does not exist, so the response time matches
    /// a wrong password.
    pub fn reject_unknown_account(&self, password: &str) -> AppError {
        if let Some(hash) = dummy_hash() {
            let _ = verify_password(password, hash);
        }
        AppError::auth(AuthFailure::InvalidCredentials)
    }
}

fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("barkeep-unknown-account").ok())
        .as_deref()
}
