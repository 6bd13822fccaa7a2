//! In-memory repositories for tests
//!
//! Behave like the PostgreSQL implementations, including unique email and
//! session id checks, and expose a few hooks for driving edge cases.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use barkeep_common::JwtService;
use barkeep_core::entities::{NewRefreshSession, RefreshSession, User};
use barkeep_core::error::DomainError;
use barkeep_core::traits::{RefreshSessionRepository, RepoResult, UserRepository};

use crate::services::ServiceContext;

/// Users keyed by id, stored with their password hash
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, (User, String)>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a user, leaving their sessions behind
    pub fn remove(&self, id: Uuid) -> bool {
        self.users.lock().remove(&id).is_some()
    }

    /// Current token version, if the user exists
    pub fn token_version(&self, id: Uuid) -> Option<i32> {
        self.users.lock().get(&id).map(|(u, _)| u.token_version)
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.users.lock().get(&id).map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.users.lock().values().any(|(u, _)| u.email == email))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut users = self.users.lock();
        if users.values().any(|(u, _)| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        users.insert(user.id, (user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>> {
        Ok(self.users.lock().get(&id).map(|(_, h)| h.clone()))
    }

    async fn increment_token_version(&self, id: Uuid) -> RepoResult<i32> {
        let mut users = self.users.lock();
        let (user, _) = users.get_mut(&id).ok_or(DomainError::UserNotFound(id))?;
        user.token_version += 1;
        Ok(user.token_version)
    }
}

/// Refresh sessions in insertion order
#[derive(Debug, Default)]
pub struct InMemoryRefreshSessionRepository {
    sessions: Mutex<Vec<RefreshSession>>,
}

impl InMemoryRefreshSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one session
    pub fn get(&self, session_id: Uuid) -> Option<RefreshSession> {
        self.sessions
            .lock()
            .iter()
            .find(|s| s.session_id == session_id)
            .cloned()
    }

    /// Every session of a user, revoked or not
    pub fn sessions_for(&self, user_id: Uuid) -> Vec<RefreshSession> {
        self.sessions
            .lock()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Move a session's stored expiry into the past
    pub fn expire(&self, session_id: Uuid) -> bool {
        self.update(session_id, |s| s.expires_at = Utc::now() - Duration::seconds(1))
    }

    /// Replace the stored hash, as if a different token had been issued
    pub fn overwrite_hash(&self, session_id: Uuid, token_hash: &str) -> bool {
        self.update(session_id, |s| s.token_hash = token_hash.to_string())
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    fn update(&self, session_id: Uuid, f: impl FnOnce(&mut RefreshSession)) -> bool {
        let mut sessions = self.sessions.lock();
        match sessions.iter_mut().find(|s| s.session_id == session_id) {
            Some(session) => {
                f(session);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl RefreshSessionRepository for InMemoryRefreshSessionRepository {
    async fn create(&self, new: &NewRefreshSession) -> RepoResult<RefreshSession> {
        let mut sessions = self.sessions.lock();
        if sessions.iter().any(|s| s.session_id == new.session_id) {
            return Err(DomainError::SessionIdCollision(new.session_id));
        }

        let session = RefreshSession {
            id: sessions.len() as i64 + 1,
            user_id: new.user_id,
            session_id: new.session_id,
            token_hash: new.token_hash.clone(),
            user_agent: new.user_agent.clone(),
            ip: new.ip.clone(),
            created_at: Utc::now(),
            expires_at: new.expires_at,
            revoked_at: None,
        };
        sessions.push(session.clone());
        Ok(session)
    }

    async fn find_by_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<RefreshSession>> {
        Ok(self
            .sessions
            .lock()
            .iter()
            .find(|s| s.session_id == session_id && s.user_id == user_id)
            .cloned())
    }

    async fn revoke(&self, session_id: Uuid, user_id: Uuid, token_hash: &str) -> RepoResult<bool> {
        let mut sessions = self.sessions.lock();
        let target = sessions.iter_mut().find(|s| {
            s.session_id == session_id
                && s.user_id == user_id
                && s.token_hash == token_hash
                && s.revoked_at.is_none()
        });
        Ok(match target {
            Some(session) => {
                session.revoked_at = Some(Utc::now());
                true
            }
            None => false,
        })
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> RepoResult<u64> {
        let now = Utc::now();
        let mut count = 0;
        for session in self.sessions.lock().iter_mut() {
            if session.user_id == user_id && session.revoked_at.is_none() {
                session.revoked_at = Some(now);
                count += 1;
            }
        }
        Ok(count)
    }
}

/// A context over fresh in-memory repositories, plus handles to them
pub struct InMemoryContext {
    pub ctx: ServiceContext,
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemoryRefreshSessionRepository>,
}

impl InMemoryContext {
    pub fn new(jwt_service: JwtService) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let sessions = Arc::new(InMemoryRefreshSessionRepository::new());
        let ctx = ServiceContext::new(
            None,
            users.clone(),
            sessions.clone(),
            Arc::new(jwt_service),
        );
        Self {
            ctx,
            users,
            sessions,
        }
    }
}
