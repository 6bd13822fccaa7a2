//! Authentication handlers
//!
//! Session lifecycle endpoints. Tokens travel as HttpOnly cookies; bodies
//! only ever carry the envelope.

use axum::{extract::State, Json};
use axum_extra::extract::CookieJar;
use barkeep_common::AuthFailure;
use barkeep_service::dto::{
    IssuedSession, LoginRequest, RegisterRequest, SessionIdentity, UserProfile,
};
use barkeep_service::SessionService;

use crate::extractors::{AuthUser, ClientInfo, SessionCredentials, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, Envelope};
use crate::state::AppState;

/// Write both cookies for a freshly issued session
fn session_cookies(
    state: &AppState,
    jar: CookieJar,
    session: IssuedSession,
) -> (CookieJar, UserProfile) {
    let jwt = state.service_context().jwt_service();
    let jar = state.cookie_policy().write_session(
        jar,
        session.access_token,
        jwt.access_token_ttl(),
        session.refresh_token,
        jwt.refresh_token_ttl(),
    );
    (jar, session.user)
}

/// Register a new user
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ClientInfo(client): ClientInfo,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<(CookieJar, Json<Envelope<UserProfile>>)>> {
    let session = SessionService::new(state.service_context())
        .register(request, client)
        .await?;

    let (jar, user) = session_cookies(&state, jar, session);
    Ok(Created((jar, Json(Envelope::with_user(user)))))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ClientInfo(client): ClientInfo,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<Envelope<UserProfile>>)> {
    let session = SessionService::new(state.service_context())
        .login(request, client)
        .await?;

    let (jar, user) = session_cookies(&state, jar, session);
    Ok((jar, Json(Envelope::with_user(user))))
}

/// Exchange the refresh cookie for a new access cookie
///
/// Every failure clears both cookies.
///
/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    credentials: SessionCredentials,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Envelope>), (CookieJar, ApiError)> {
    let policy = state.cookie_policy();

    let Some(token) = credentials.refresh() else {
        return Err((policy.clear_session(jar), AuthFailure::MissingToken.into()));
    };

    match SessionService::new(state.service_context())
        .refresh(Some(token))
        .await
    {
        Ok(grant) => {
            let ttl = state.service_context().jwt_service().access_token_ttl();
            let jar = policy.write_access(jar, grant.access_token, ttl);
            Ok((jar, Json(Envelope::refreshed())))
        }
        Err(e) => Err((policy.clear_session(jar), e.into())),
    }
}

/// Revoke the current session
///
/// Always succeeds and clears both cookies, whatever the refresh cookie holds.
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    credentials: SessionCredentials,
    jar: CookieJar,
) -> (CookieJar, Json<Envelope>) {
    if let Err(e) = SessionService::new(state.service_context())
        .logout(credentials.refresh())
        .await
    {
        tracing::debug!(error = %e, "Logout without a revocable session");
    }

    (state.cookie_policy().clear_session(jar), Json(Envelope::ok()))
}

/// Invalidate every session of the caller
///
/// POST /auth/logout_all
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<Envelope>)> {
    SessionService::new(state.service_context())
        .logout_all(auth.user_id())
        .await?;

    Ok((state.cookie_policy().clear_session(jar), Json(Envelope::ok())))
}

/// Identity carried by the access token
///
/// GET /auth/whoami
pub async fn whoami(AuthUser(identity): AuthUser) -> Json<Envelope<SessionIdentity>> {
    Json(Envelope::with_user(identity))
}
