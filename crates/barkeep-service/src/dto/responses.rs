//! Response DTOs for the session endpoints
//!
//! `IssuedSession` and `AccessGrant` carry raw tokens back to the transport
//! layer; they are never serialized into a response body.

use barkeep_common::AccessClaims;
use barkeep_core::entities::{FavoriteBase, User};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Public user profile (never includes the password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub favorite_base: FavoriteBase,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            favorite_base: user.favorite_base,
            created_at: user.created_at,
        }
    }
}

/// Identity carried by a verified access token, rendered as `{id, email}`
pub type SessionIdentity = AccessClaims;

/// Result of register/login: a profile plus a freshly minted token pair
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub user: UserProfile,
    pub session_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a successful refresh: a new access token for the same session
#[derive(Debug, Clone)]
pub struct AccessGrant {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub access_token: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub database: String,
}

impl ReadinessResponse {
    pub fn from_database(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
