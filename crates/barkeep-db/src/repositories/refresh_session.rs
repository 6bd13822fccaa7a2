//! PostgreSQL implementation of RefreshSessionRepository
//!
//! Backed by the `refresh_tokens` table. Rows are never deleted; revocation
//! stamps `revoked_at`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use barkeep_core::entities::{NewRefreshSession, RefreshSession};
use barkeep_core::error::DomainError;
use barkeep_core::traits::{RefreshSessionRepository, RepoResult};

use crate::models::RefreshTokenModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of RefreshSessionRepository
#[derive(Clone)]
pub struct PgRefreshSessionRepository {
    pool: PgPool,
}

impl PgRefreshSessionRepository {
    /// Create a new PgRefreshSessionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshSessionRepository for PgRefreshSessionRepository {
    #[instrument(skip(self, session), fields(user_id = %session.user_id, session_id = %session.session_id))]
    async fn create(&self, session: &NewRefreshSession) -> RepoResult<RefreshSession> {
        let model = sqlx::query_as::<_, RefreshTokenModel>(
            r"
            INSERT INTO refresh_tokens (user_id, session_id, token_hash, user_agent, ip, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, session_id, token_hash, user_agent, ip,
                      created_at, expires_at, revoked_at
            ",
        )
        .bind(session.user_id)
        .bind(session.session_id)
        .bind(&session.token_hash)
        .bind(&session.user_agent)
        .bind(&session.ip)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || DomainError::SessionIdCollision(session.session_id))
        })?;

        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn find_by_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<RefreshSession>> {
        let result = sqlx::query_as::<_, RefreshTokenModel>(
            r"
            SELECT id, user_id, session_id, token_hash, user_agent, ip,
                   created_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE session_id = $1 AND user_id = $2
            ",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RefreshSession::from))
    }

    #[instrument(skip(self, token_hash))]
    async fn revoke(&self, session_id: Uuid, user_id: Uuid, token_hash: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE refresh_tokens
            SET revoked_at = NOW()
            WHERE session_id = $1 AND user_id = $2 AND token_hash = $3 AND revoked_at IS NULL
            ",
        )
        .bind(session_id)
        .bind(user_id)
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn revoke_all_for_user(&self, user_id: Uuid) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE refresh_tokens
            SET revoked_at = NOW()
            WHERE user_id = $1 AND revoked_at IS NULL
            ",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
