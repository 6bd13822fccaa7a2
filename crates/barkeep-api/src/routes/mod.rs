//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, health, me};
use crate::state::AppState;

/// Session and profile routes (health is mounted separately so it skips rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().merge(auth_routes()).merge(profile_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Session lifecycle routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/logout_all", post(auth::logout_all))
        .route("/auth/whoami", get(auth::whoami))
}

fn profile_routes() -> Router<AppState> {
    Router::new().route("/me", get(me::get_me))
}
