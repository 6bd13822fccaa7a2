//! Refresh session entity - the server-side record of an issued refresh token

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Lifecycle state of a refresh session at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Revoked,
    Expired,
}

/// A persisted refresh session
///
/// Rows are never deleted; revocation only sets `revoked_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSession {
    pub id: i64,
    pub user_id: Uuid,
    pub session_id: Uuid,
    /// Hex SHA-256 of the raw refresh token
    pub token_hash: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshSession {
    /// Check if the session has been revoked
    #[inline]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Check if the session is past its expiry at `now`
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check if the stored hash matches `token_hash`
    #[inline]
    pub fn matches_hash(&self, token_hash: &str) -> bool {
        self.token_hash == token_hash
    }

    /// Current lifecycle state. Revocation wins over expiry.
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        if self.is_revoked() {
            SessionState::Revoked
        } else if self.is_expired_at(now) {
            SessionState::Expired
        } else {
            SessionState::Active
        }
    }
}

/// Values needed to insert a new refresh session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRefreshSession {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub token_hash: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl NewRefreshSession {
    /// Create a new session record without client metadata
    pub fn new(
        user_id: Uuid,
        session_id: Uuid,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            session_id,
            token_hash,
            user_agent: None,
            ip: None,
            expires_at,
        }
    }

    /// Attach the client's user agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Attach the client's IP address
    #[must_use]
    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip = ip;
        self
    }
}
