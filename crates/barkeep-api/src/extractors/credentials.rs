//! Credential lookup
//!
//! The access token comes from the `access_token` cookie, falling back to an
//! `Authorization: Bearer` header. The refresh token only ever comes from the
//! `refresh_token` cookie.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization, HeaderMapExt},
};

use crate::cookies::{ACCESS_COOKIE, REFRESH_COOKIE};

/// Raw tokens presented with a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCredentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionCredentials {
    /// Read both tokens from the request headers
    pub fn from_parts(parts: &Parts) -> Self {
        let jar = CookieJar::from_headers(&parts.headers);

        let access_token = cookie_value(&jar, ACCESS_COOKIE).or_else(|| {
            parts
                .headers
                .typed_get::<Authorization<Bearer>>()
                .map(|Authorization(bearer)| bearer.token().to_string())
        });

        Self {
            access_token,
            refresh_token: cookie_value(&jar, REFRESH_COOKIE),
        }
    }

    pub fn access(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }
}

/// Empty cookie values count as absent
fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionCredentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request};

    fn parts(headers: &[(header::HeaderName, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_reads_both_cookies() {
        let parts = parts(&[(header::COOKIE, "access_token=a1; refresh_token=r1")]);
        let creds = SessionCredentials::from_parts(&parts);

        assert_eq!(creds.access(), Some("a1"));
        assert_eq!(creds.refresh(), Some("r1"));
    }

    #[test]
    fn test_cookie_wins_over_bearer() {
        let parts = parts(&[
            (header::COOKIE, "access_token=from-cookie"),
            (header::AUTHORIZATION, "Bearer from-header"),
        ]);
        assert_eq!(SessionCredentials::from_parts(&parts).access(), Some("from-cookie"));
    }

    #[test]
    fn test_bearer_fallback_for_access_only() {
        let parts = parts(&[(header::AUTHORIZATION, "Bearer from-header")]);
        let creds = SessionCredentials::from_parts(&parts);

        assert_eq!(creds.access(), Some("from-header"));
        assert_eq!(creds.refresh(), None);
    }

    #[test]
    fn test_nothing_presented() {
        let creds = SessionCredentials::from_parts(&parts(&[]));
        assert_eq!(creds, SessionCredentials::default());

        let creds = SessionCredentials::from_parts(&parts(&[(header::COOKIE, "access_token=")]));
        assert_eq!(creds.access(), None);
    }
}
