//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{NewRefreshSession, RefreshSession, User};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new user
    ///
    /// Fails with `DomainError::EmailAlreadyExists` if the email is claimed
    /// concurrently.
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>>;

    /// Atomically increment the user's token version and return the new value
    async fn increment_token_version(&self, id: Uuid) -> RepoResult<i32>;
}

// ============================================================================
// Refresh Session Repository
// ============================================================================

/// Durable store of issued refresh credentials
///
/// Every call goes to the backing store; implementations must not cache, so
/// a refresh always observes the latest revocation.
#[async_trait]
pub trait RefreshSessionRepository: Send + Sync {
    /// Insert a new active session
    ///
    /// Fails with `DomainError::SessionIdCollision` if `session_id` was
    /// already issued.
    async fn create(&self, session: &NewRefreshSession) -> RepoResult<RefreshSession>;

    /// Find the record for `session_id` owned by `user_id`, revoked or not
    async fn find_by_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<RefreshSession>>;

    /// Revoke one session if it is unrevoked and its hash matches
    ///
    /// Returns whether a record changed. Revoking an absent or already
    /// revoked session is not an error.
    async fn revoke(&self, session_id: Uuid, user_id: Uuid, token_hash: &str) -> RepoResult<bool>;

    /// Revoke every unrevoked session of a user, returning how many changed
    async fn revoke_all_for_user(&self, user_id: Uuid) -> RepoResult<u64>;
}
