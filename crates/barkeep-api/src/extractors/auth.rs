//! Authentication extractor
//!
//! Verifies the presented access token and yields its identity.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use barkeep_service::{dto::SessionIdentity, SessionService};
use uuid::Uuid;

use super::credentials::SessionCredentials;
use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionIdentity);

impl AuthUser {
    pub fn user_id(&self) -> Uuid {
        self.0.user_id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let credentials = SessionCredentials::from_parts(parts);
        let app_state = AppState::from_ref(state);

        let identity = SessionService::new(app_state.service_context())
            .whoami(credentials.access())
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                ApiError::from(e)
            })?;

        Ok(Self(identity))
    }
}
