//! Current user profile

use axum::{extract::State, Json};
use barkeep_service::{dto::UserProfile, SessionService};

use crate::extractors::AuthUser;
use crate::response::{ApiResult, Envelope};
use crate::state::AppState;

/// Profile of the authenticated user
///
/// GET /me
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Envelope<UserProfile>>> {
    let profile = SessionService::new(state.service_context())
        .profile(auth.user_id())
        .await?;
    Ok(Json(Envelope::with_user(profile)))
}
