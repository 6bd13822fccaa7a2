//! Credential signing, password hashing, and refresh token digests

mod jwt;
mod password;
mod token_hash;

pub use jwt::{AccessClaims, Claims, JwtService, RefreshClaims, TokenType};
pub use password::{hash_password, verify_password, PasswordService};
pub use token_hash::hash_refresh_token;
