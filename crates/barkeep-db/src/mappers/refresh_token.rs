//! Refresh token model -> entity mapper

use barkeep_core::entities::RefreshSession;

use crate::models::RefreshTokenModel;

impl From<RefreshTokenModel> for RefreshSession {
    fn from(model: RefreshTokenModel) -> Self {
        RefreshSession {
            id: model.id,
            user_id: model.user_id,
            session_id: model.session_id,
            token_hash: model.token_hash,
            user_agent: model.user_agent,
            ip: model.ip,
            created_at: model.created_at,
            expires_at: model.expires_at,
            revoked_at: model.revoked_at,
        }
    }
}
