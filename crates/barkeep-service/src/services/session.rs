//! Session lifecycle service
//!
//! Register, login, refresh, logout, and global logout. Access tokens are
//! stateless; refresh tokens are bound to a stored session by `session_id`
//! and to the user's `token_version` at issue time.
//!
//! Refresh re-issues the access token only. The refresh token stays valid
//! until its own expiry or revocation.

use chrono::{Duration, Utc};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use barkeep_common::{hash_refresh_token, AccessClaims, AppError, AuthFailure, RefreshClaims};
use barkeep_core::entities::{NewRefreshSession, User};
use barkeep_core::error::DomainError;

use crate::dto::{
    AccessGrant, ClientMeta, IssuedSession, LoginRequest, RegisterRequest, SessionIdentity,
    UserProfile,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Attempts at inserting a session before giving up on id collisions
const SESSION_INSERT_ATTEMPTS: usize = 3;

/// Session lifecycle service
pub struct SessionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionService<'a> {
    /// Create a new SessionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user and open their first session
    #[instrument(skip(self, request, client), fields(email = %request.email))]
    pub async fn register(
        &self,
        request: RegisterRequest,
        client: ClientMeta,
    ) -> ServiceResult<IssuedSession> {
        request.validate()?;
        let favorite_base = request.favorite_base().ok_or_else(|| {
            ServiceError::App(AppError::validation("favorite_base", "Invalid favorite base"))
        })?;

        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(ServiceError::conflict("Email already registered"));
        }

        let password_hash = self.ctx.password_service().hash(&request.password)?;

        let user = User::new(request.email, request.display_name, favorite_base);
        self.ctx
            .user_repo()
            .create(&user, &password_hash)
            .await
            .map_err(|e| match e {
                DomainError::EmailAlreadyExists => {
                    ServiceError::conflict("Email already registered")
                }
                other => other.into(),
            })?;

        info!(user_id = %user.id, "User registered");

        self.issue_session(&user, client).await
    }

    /// Check credentials and open a new session
    ///
    /// Unknown email and wrong password fail identically.
    #[instrument(skip(self, request, client), fields(email = %request.email))]
    pub async fn login(
        &self,
        request: LoginRequest,
        client: ClientMeta,
    ) -> ServiceResult<IssuedSession> {
        request.validate()?;
        let passwords = self.ctx.password_service();

        let Some(user) = self.ctx.user_repo().find_by_email(&request.email).await? else {
            debug!("Login rejected: unknown email");
            return Err(passwords.reject_unknown_account(&request.password).into());
        };

        let Some(password_hash) = self.ctx.user_repo().get_password_hash(user.id).await? else {
            warn!(user_id = %user.id, "Login rejected: no password hash on record");
            return Err(passwords.reject_unknown_account(&request.password).into());
        };

        if let Err(e) = passwords.verify_or_error(&request.password, &password_hash) {
            debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(e.into());
        }

        info!(user_id = %user.id, "User logged in");

        self.issue_session(&user, client).await
    }

    /// Exchange a refresh token for a new access token
    ///
    /// Auth failures keep their internal cause for logs and tests. Any other
    /// failure is logged and reported as a plain `Unauthorized`.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: Option<&str>) -> ServiceResult<AccessGrant> {
        match self.check_refresh(refresh_token).await {
            Ok(grant) => {
                debug!(user_id = %grant.user_id, session_id = %grant.session_id, "Access token refreshed");
                Ok(grant)
            }
            Err(err) => match err.auth_failure() {
                Some(cause) => {
                    warn!(cause = cause.code(), "Refresh rejected");
                    Err(err)
                }
                None => {
                    error!(error = %err, "Refresh failed");
                    Err(AuthFailure::Unauthorized.into())
                }
            },
        }
    }

    /// Revoke the session behind a refresh token
    ///
    /// Returns whether a stored session was revoked. Callers report success
    /// regardless of the outcome.
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(&self, refresh_token: Option<&str>) -> ServiceResult<bool> {
        let Some(token) = refresh_token else {
            return Ok(false);
        };

        let claims = self.ctx.jwt_service().verify_refresh(token)?;
        let revoked = self
            .ctx
            .session_repo()
            .revoke(claims.session_id, claims.user_id, &hash_refresh_token(token))
            .await?;

        info!(user_id = %claims.user_id, session_id = %claims.session_id, revoked, "User logged out");
        Ok(revoked)
    }

    /// Invalidate every refresh token of a user
    ///
    /// The version bump alone is enough to reject outstanding tokens; the bulk
    /// revoke keeps the stored records consistent with it.
    #[instrument(skip(self))]
    pub async fn logout_all(&self, user_id: Uuid) -> ServiceResult<u64> {
        let token_version = self.ctx.user_repo().increment_token_version(user_id).await?;
        let revoked = self.ctx.session_repo().revoke_all_for_user(user_id).await?;

        info!(user_id = %user_id, token_version, revoked, "User logged out everywhere");
        Ok(revoked)
    }

    /// Verify an access token and return its identity
    pub fn whoami(&self, access_token: Option<&str>) -> ServiceResult<SessionIdentity> {
        let token = access_token.ok_or(AuthFailure::MissingToken)?;
        Ok(self.ctx.jwt_service().verify_access(token)?)
    }

    /// Load the profile of an authenticated user
    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: Uuid) -> ServiceResult<UserProfile> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        Ok(UserProfile::from(&user))
    }

    /// The refresh checks, in order: signature and expiry of the token, stored
    /// record, revocation, hash, stored expiry, token version.
    async fn check_refresh(&self, refresh_token: Option<&str>) -> ServiceResult<AccessGrant> {
        let token = refresh_token.ok_or(AuthFailure::MissingToken)?;
        let claims = self.ctx.jwt_service().verify_refresh(token)?;

        let session = self
            .ctx
            .session_repo()
            .find_by_session(claims.session_id, claims.user_id)
            .await?
            .ok_or(AuthFailure::NotRegistered)?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(claims.user_id)
            .await?
            .ok_or(AuthFailure::NotRegistered)?;

        if session.is_revoked() {
            return Err(AuthFailure::Revoked.into());
        }
        if !session.matches_hash(&hash_refresh_token(token)) {
            return Err(AuthFailure::HashMismatch.into());
        }
        if session.is_expired_at(Utc::now()) {
            return Err(AuthFailure::Expired.into());
        }
        if !user.accepts_token_version(claims.token_version) {
            return Err(AuthFailure::StaleVersion.into());
        }

        let access_token = self.ctx.jwt_service().sign_access(&claims.access_claims())?;

        Ok(AccessGrant {
            user_id: claims.user_id,
            session_id: claims.session_id,
            access_token,
        })
    }

    /// Mint a token pair under a new session id and persist the refresh record
    async fn issue_session(&self, user: &User, client: ClientMeta) -> ServiceResult<IssuedSession> {
        let jwt = self.ctx.jwt_service();
        let ttl = jwt.refresh_token_ttl();
        let expires_at = Duration::try_seconds(ttl)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| ServiceError::internal(format!("Refresh TTL out of range: {ttl}s")))?;

        for _ in 0..SESSION_INSERT_ATTEMPTS {
            let claims = RefreshClaims {
                user_id: user.id,
                email: user.email.clone(),
                token_version: user.token_version,
                session_id: Uuid::new_v4(),
            };
            let refresh_token = jwt.sign_refresh(&claims)?;

            let record = NewRefreshSession::new(
                user.id,
                claims.session_id,
                hash_refresh_token(&refresh_token),
                expires_at,
            )
            .with_user_agent(client.user_agent.clone())
            .with_ip(client.ip.clone());

            match self.ctx.session_repo().create(&record).await {
                Ok(_) => {}
                Err(DomainError::SessionIdCollision(id)) => {
                    warn!(session_id = %id, "Session id collision, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            let access_token = jwt.sign_access(&AccessClaims::new(user.id, user.email.clone()))?;
            debug!(user_id = %user.id, session_id = %claims.session_id, "Session issued");

            return Ok(IssuedSession {
                user: UserProfile::from(user),
                session_id: claims.session_id,
                access_token,
                refresh_token,
            });
        }

        Err(ServiceError::internal("could not allocate a unique session id"))
    }
}
