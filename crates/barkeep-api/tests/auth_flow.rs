//! HTTP tests for the session endpoints
//!
//! Drive the full router over in-memory repositories:
//!
//! ```bash
//! cargo test -p barkeep-api --test auth_flow
//! ```

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use barkeep_api::{cookies::CookiePolicy, create_app, AppState};
use barkeep_common::{JwtService, AUTH_FAILED_MESSAGE};
use barkeep_service::testing::{
    InMemoryContext, InMemoryRefreshSessionRepository, InMemoryUserRepository,
};

const PASSWORD: &str = "pw12345678";

struct TestApp {
    router: Router,
    users: Arc<InMemoryUserRepository>,
    sessions: Arc<InMemoryRefreshSessionRepository>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_policy(CookiePolicy::default())
    }

    fn with_policy(policy: CookiePolicy) -> Self {
        let memory = InMemoryContext::new(JwtService::new("test-secret", 900, 604_800));
        let users = memory.users.clone();
        let sessions = memory.sessions.clone();
        Self {
            router: create_app(AppState::new(memory.ctx, policy)),
            users,
            sessions,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post(&self, uri: &str, body: Option<Value>, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn register(&self, email: &str) -> Response {
        self.post(
            "/auth/register",
            Some(json!({
                "email": email,
                "password": PASSWORD,
                "display_name": "A",
                "favorite_base": "RON",
            })),
            None,
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> Response {
        self.post(
            "/auth/login",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Register then log in, returning the login tokens
    async fn signed_in(&self, email: &str) -> Tokens {
        assert_eq!(self.register(email).await.status(), StatusCode::CREATED);
        let response = self.login(email, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::OK);
        Tokens::from_response(&response)
    }
}

struct Tokens {
    access: String,
    refresh: String,
}

impl Tokens {
    fn from_response(response: &Response) -> Self {
        let cookies = set_cookies(response);
        Self {
            access: cookie_value(&cookies, "access_token").unwrap(),
            refresh: cookie_value(&cookies, "refresh_token").unwrap(),
        }
    }

    fn access_cookie(&self) -> String {
        format!("access_token={}", self.access)
    }

    fn refresh_cookie(&self) -> String {
        format!("refresh_token={}", self.refresh)
    }
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn find_cookie<'a>(cookies: &'a [String], name: &str) -> Option<&'a String> {
    let prefix = format!("{name}=");
    cookies.iter().find(|c| c.starts_with(&prefix))
}

fn cookie_value(cookies: &[String], name: &str) -> Option<String> {
    find_cookie(cookies, name).map(|c| {
        c.split(';').next().unwrap()[name.len() + 1..].to_string()
    })
}

fn assert_cleared(response: &Response) {
    let cookies = set_cookies(response);
    for name in ["access_token", "refresh_token"] {
        let cookie = find_cookie(&cookies, name).unwrap_or_else(|| panic!("{name} not cleared"));
        assert!(cookie.starts_with(&format!("{name}=;")), "{cookie}");
        assert!(cookie.contains("Max-Age=0"), "{cookie}");
        assert!(cookie.contains("Path=/"), "{cookie}");
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn user_id(body: &Value) -> Uuid {
    body["user"]["id"].as_str().unwrap().parse().unwrap()
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_register_login_refresh_logout_scenario() {
    let app = TestApp::new();

    let response = app.register("a@x.com").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(set_cookies(&response).len(), 2);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["favorite_base"], "RON");
    let id = user_id(&body);

    let response = app.login("a@x.com", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let tokens = Tokens::from_response(&response);
    assert_eq!(user_id(&body_json(response).await), id);

    // register and login each opened a session
    let sessions = app.sessions.sessions_for(id);
    assert_eq!(sessions.len(), 2);

    let response = app
        .post("/auth/refresh", None, Some(&tokens.refresh_cookie()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookie_value(&cookies, "access_token").is_some());
    assert_eq!(body_json(response).await, json!({ "ok": true, "rotated": false }));

    // refresh does not open a new session
    assert_eq!(app.sessions.sessions_for(id).len(), 2);

    let response = app
        .post("/auth/logout", None, Some(&tokens.refresh_cookie()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_cleared(&response);
    assert_eq!(body_json(response).await, json!({ "ok": true }));

    let revoked = app
        .sessions
        .sessions_for(id)
        .into_iter()
        .filter(|s| s.is_revoked())
        .count();
    assert_eq!(revoked, 1);

    let response = app
        .post("/auth/refresh", None, Some(&tokens.refresh_cookie()))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_cleared(&response);
    assert_eq!(
        body_json(response).await,
        json!({ "ok": false, "message": AUTH_FAILED_MESSAGE })
    );
}

#[tokio::test]
async fn test_logout_all_invalidates_every_session() {
    let app = TestApp::new();
    let first = app.signed_in("multi@x.com").await;
    let second = Tokens::from_response(&app.login("multi@x.com", PASSWORD).await);

    let response = app
        .post("/auth/logout_all", None, Some(&first.access_cookie()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_cleared(&response);

    for tokens in [&first, &second] {
        let response = app
            .post("/auth/refresh", None, Some(&tokens.refresh_cookie()))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app.get("/auth/whoami", Some(&first.access_cookie())).await;
    let id = user_id(&body_json(response).await);
    assert_eq!(app.users.token_version(id), Some(1));
    assert!(app.sessions.sessions_for(id).iter().all(|s| s.is_revoked()));
}

#[tokio::test]
async fn test_logout_all_requires_access_token() {
    let app = TestApp::new();
    let tokens = app.signed_in("guard@x.com").await;

    // a refresh token is not an access token
    let cookie = format!("access_token={}", tokens.refresh);
    let response = app.post("/auth/logout_all", None, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.post("/auth/logout_all", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_session_still_succeeds() {
    let app = TestApp::new();

    let response = app.post("/auth/logout", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_cleared(&response);

    let response = app
        .post("/auth/logout", None, Some("refresh_token=garbage"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "ok": true }));
}

// ============================================================================
// Refresh failures
// ============================================================================

#[tokio::test]
async fn test_refresh_without_cookie() {
    let app = TestApp::new();

    let response = app.post("/auth/refresh", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_cleared(&response);
    assert_eq!(body_json(response).await["message"], AUTH_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::new();
    let tokens = app.signed_in("swap@x.com").await;

    let cookie = format!("refresh_token={}", tokens.access);
    let response = app.post("/auth/refresh", None, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_cleared(&response);
}

#[tokio::test]
async fn test_refresh_rejects_replaced_hash() {
    let app = TestApp::new();
    let tokens = app.signed_in("hash@x.com").await;

    for session in app.sessions.sessions_for(app_user(&app, &tokens).await) {
        app.sessions.overwrite_hash(session.session_id, "0000");
    }

    let response = app
        .post("/auth/refresh", None, Some(&tokens.refresh_cookie()))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({ "ok": false, "message": AUTH_FAILED_MESSAGE })
    );
}

async fn app_user(app: &TestApp, tokens: &Tokens) -> Uuid {
    let response = app.get("/auth/whoami", Some(&tokens.access_cookie())).await;
    user_id(&body_json(response).await)
}

// ============================================================================
// Register / login failures
// ============================================================================

#[tokio::test]
async fn test_duplicate_registration() {
    let app = TestApp::new();
    assert_eq!(app.register("dup@x.com").await.status(), StatusCode::CREATED);

    let response = app.register("dup@x.com").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(
        body_json(response).await,
        json!({ "ok": false, "message": "Email already registered" })
    );
    assert_eq!(app.users.len(), 1);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new();
    app.register("known@x.com").await;

    let wrong = app.login("known@x.com", "not-the-password").await;
    let unknown = app.login("nobody@x.com", PASSWORD).await;

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&wrong).is_empty());
    assert_eq!(body_json(wrong).await, body_json(unknown).await);
}

#[tokio::test]
async fn test_register_validation_message() {
    let app = TestApp::new();

    let response = app
        .post(
            "/auth/register",
            Some(json!({
                "email": "v@x.com",
                "password": "short",
                "display_name": "Val",
                "favorite_base": "GIN",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "ok": false, "message": "Password must be at least 8 characters" })
    );
    assert!(app.users.is_empty());
}

#[tokio::test]
async fn test_display_name_boundary() {
    let app = TestApp::new();
    let body = |email: &str, display_name: &str| {
        json!({
            "email": email,
            "password": PASSWORD,
            "display_name": display_name,
            "favorite_base": "GIN",
        })
    };

    let response = app
        .post("/auth/register", Some(body("empty@x.com", "")), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "ok": false, "message": "Display name is required" })
    );
    assert!(app.users.is_empty());

    let response = app
        .post("/auth/register", Some(body("one@x.com", "A")), None)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["user"]["display_name"], "A");
    assert_eq!(app.users.len(), 1);
}

#[tokio::test]
async fn test_unreadable_body() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid request body");
}

// ============================================================================
// Identity
// ============================================================================

#[tokio::test]
async fn test_whoami_accepts_bearer_header() {
    let app = TestApp::new();
    let tokens = app.signed_in("bearer@x.com").await;

    let request = Request::builder()
        .uri("/auth/whoami")
        .header(header::AUTHORIZATION, format!("Bearer {}", tokens.access))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["user"]["email"], "bearer@x.com");
    assert!(body["user"].get("display_name").is_none());
}

#[tokio::test]
async fn test_whoami_without_credentials() {
    let app = TestApp::new();

    let response = app.get("/auth/whoami", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({ "ok": false, "message": AUTH_FAILED_MESSAGE })
    );
}

#[tokio::test]
async fn test_me_returns_profile() {
    let app = TestApp::new();
    let tokens = app.signed_in("me@x.com").await;

    let response = app.get("/me", Some(&tokens.access_cookie())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["display_name"], "A");
    assert_eq!(body["user"]["favorite_base"], "RON");

    app.users.remove(user_id(&body));
    let response = app.get("/me", Some(&tokens.access_cookie())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["ok"], false);
}

// ============================================================================
// Cookies
// ============================================================================

#[tokio::test]
async fn test_session_cookie_attributes() {
    let app = TestApp::new();
    let response = app.register("attrs@x.com").await;
    let cookies = set_cookies(&response);

    let access = find_cookie(&cookies, "access_token").unwrap();
    let refresh = find_cookie(&cookies, "refresh_token").unwrap();
    for cookie in [access, refresh] {
        assert!(cookie.contains("HttpOnly"), "{cookie}");
        assert!(cookie.contains("SameSite=Lax"), "{cookie}");
        assert!(cookie.contains("Path=/"), "{cookie}");
        assert!(!cookie.contains("Secure"), "{cookie}");
    }
    assert!(access.contains("Max-Age=900"));
    assert!(refresh.contains("Max-Age=604800"));
}

#[tokio::test]
async fn test_secure_cookies_when_policy_requires() {
    let app = TestApp::with_policy(CookiePolicy { secure: true });
    let response = app.register("secure@x.com").await;

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Secure")));
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");

    let response = app.get("/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ready");
}
