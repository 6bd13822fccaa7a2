//! Session cookies
//!
//! Writes and clears the `access_token` / `refresh_token` cookies. Every
//! session cookie is HttpOnly, SameSite=Lax, scoped to `/`, and lives exactly
//! as long as the token it carries.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use barkeep_common::Environment;

/// Cookie holding the access token
pub const ACCESS_COOKIE: &str = "access_token";

/// Cookie holding the refresh token
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Attributes that depend on the deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CookiePolicy {
    /// Emit the `Secure` attribute
    pub secure: bool,
}

impl CookiePolicy {
    /// `Secure` only in production
    pub fn for_environment(env: Environment) -> Self {
        Self {
            secure: env.is_production(),
        }
    }

    /// Build one session cookie
    pub fn cookie(&self, name: &'static str, value: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path("/")
            .max_age(time::Duration::seconds(max_age_secs))
            .build()
    }

    /// Set both session cookies
    pub fn write_session(
        &self,
        jar: CookieJar,
        access_token: String,
        access_ttl: i64,
        refresh_token: String,
        refresh_ttl: i64,
    ) -> CookieJar {
        jar.add(self.cookie(REFRESH_COOKIE, refresh_token, refresh_ttl))
            .add(self.cookie(ACCESS_COOKIE, access_token, access_ttl))
    }

    /// Set the access cookie only
    pub fn write_access(&self, jar: CookieJar, access_token: String, access_ttl: i64) -> CookieJar {
        jar.add(self.cookie(ACCESS_COOKIE, access_token, access_ttl))
    }

    /// Expire both session cookies on the client
    pub fn clear_session(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.removal(ACCESS_COOKIE))
            .add(self.removal(REFRESH_COOKIE))
    }

    fn removal(&self, name: &'static str) -> Cookie<'static> {
        let mut cookie = self.cookie(name, String::new(), 0);
        cookie.make_removal();
        cookie
    }
}
