//! Refresh token digests
//!
//! Only the SHA-256 digest of a refresh token is ever persisted.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a raw refresh token
pub fn hash_refresh_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
