//! JWT credential signer
//!
//! Signs and verifies access and refresh tokens using the `jsonwebtoken` crate.
//! Verification failures are collapsed into a single outcome so callers cannot
//! tell a bad signature from an expired token.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, AuthFailure};

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
    /// Token version snapshot (refresh tokens only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ver: Option<i32>,
    /// Refresh session id (refresh tokens only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
}

impl Claims {
    /// Get the user ID
    ///
    /// # Errors
    /// Returns an authentication error if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        self.sub
            .parse::<Uuid>()
            .map_err(|_| AppError::auth(AuthFailure::InvalidOrExpired))
    }

    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Check if this is an access token
    #[must_use]
    pub fn is_access_token(&self) -> bool {
        self.token_type == TokenType::Access
    }

    /// Check if this is a refresh token
    #[must_use]
    pub fn is_refresh_token(&self) -> bool {
        self.token_type == TokenType::Refresh
    }
}

/// Verified access token claim set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessClaims {
    #[serde(rename = "id")]
    pub user_id: Uuid,
    pub email: String,
}

impl AccessClaims {
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}

/// Verified refresh token claim set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshClaims {
    pub user_id: Uuid,
    pub email: String,
    pub token_version: i32,
    pub session_id: Uuid,
}

impl RefreshClaims {
    /// Access claims for the same user
    pub fn access_claims(&self) -> AccessClaims {
        AccessClaims::new(self.user_id, self.email.clone())
    }
}

/// JWT service for signing and verifying tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: i64,
    refresh_token_ttl: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and TTLs in seconds
    #[must_use]
    pub fn new(secret: &str, access_token_ttl: i64, refresh_token_ttl: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_ttl,
            refresh_token_ttl,
        }
    }

    /// Create a JWT service from loaded configuration
    #[must_use]
    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(
            &config.secret,
            config.access_token_ttl,
            config.refresh_token_ttl,
        )
    }

    /// Access token lifetime in seconds
    #[must_use]
    pub fn access_token_ttl(&self) -> i64 {
        self.access_token_ttl
    }

    /// Refresh token lifetime in seconds
    #[must_use]
    pub fn refresh_token_ttl(&self) -> i64 {
        self.refresh_token_ttl
    }

    /// Sign an access token with the configured TTL
    ///
    /// # Errors
    /// Returns an internal error if encoding fails
    pub fn sign_access(&self, claims: &AccessClaims) -> Result<String, AppError> {
        self.encode_token(
            claims.user_id,
            &claims.email,
            TokenType::Access,
            None,
            None,
            self.access_token_ttl,
        )
    }

    /// Sign a refresh token with the configured TTL
    ///
    /// # Errors
    /// Returns an internal error if encoding fails
    pub fn sign_refresh(&self, claims: &RefreshClaims) -> Result<String, AppError> {
        self.sign_refresh_with_ttl(claims, self.refresh_token_ttl)
    }

    /// Sign a refresh token with an explicit TTL in seconds
    ///
    /// # Errors
    /// Returns an internal error if encoding fails
    pub fn sign_refresh_with_ttl(
        &self,
        claims: &RefreshClaims,
        ttl_seconds: i64,
    ) -> Result<String, AppError> {
        self.encode_token(
            claims.user_id,
            &claims.email,
            TokenType::Refresh,
            Some(claims.token_version),
            Some(claims.session_id),
            ttl_seconds,
        )
    }

    /// Encode a JWT token
    fn encode_token(
        &self,
        user_id: Uuid,
        email: &str,
        token_type: TokenType,
        ver: Option<i32>,
        session_id: Option<Uuid>,
        ttl_seconds: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = Duration::try_seconds(ttl_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::internal(anyhow::anyhow!("Token TTL out of range: {ttl_seconds}s"))
            })?;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            token_type,
            ver,
            session_id,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to encode JWT: {e}")))
    }

    /// Decode and verify a JWT token
    ///
    /// Signature and expiry are checked together; every failure maps to
    /// `AuthFailure::InvalidOrExpired`.
    ///
    /// # Errors
    /// Returns an authentication error if the token is invalid or expired
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(kind = ?e.kind(), "Token verification failed");
            AppError::auth(AuthFailure::InvalidOrExpired)
        })?;

        Ok(token_data.claims)
    }

    /// Verify an access token and return its claims
    ///
    /// # Errors
    /// Returns an authentication error if the token is invalid, expired, or not an access token
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, AppError> {
        let claims = self.decode_token(token)?;

        if !claims.is_access_token() {
            return Err(AppError::auth(AuthFailure::InvalidOrExpired));
        }

        Ok(AccessClaims {
            user_id: claims.user_id()?,
            email: claims.email,
        })
    }

    /// Verify a refresh token and return its claims
    ///
    /// # Errors
    /// Returns an authentication error if the token is invalid, expired, not a
    /// refresh token, or missing its session binding
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, AppError> {
        let claims = self.decode_token(token)?;

        if !claims.is_refresh_token() {
            return Err(AppError::auth(AuthFailure::InvalidOrExpired));
        }

        let user_id = claims.user_id()?;
        let (Some(token_version), Some(session_id)) = (claims.ver, claims.session_id) else {
            return Err(AppError::auth(AuthFailure::InvalidOrExpired));
        };

        Ok(RefreshClaims {
            user_id,
            email: claims.email,
            token_version,
            session_id,
        })
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish_non_exhaustive()
    }
}
