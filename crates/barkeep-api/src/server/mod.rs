//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use barkeep_common::{AppConfig, AppError, JwtService};
use barkeep_db::{create_pool, run_migrations, DatabaseConfig};
use barkeep_service::ServiceContext;
use tokio::net::TcpListener;
use tracing::info;

use crate::cookies::CookiePolicy;
use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the application with the base middleware stack
///
/// Used by tests; no CORS and no rate limiting.
pub fn create_app(state: AppState) -> Router {
    apply_middleware(create_router().merge(health_routes())).with_state(state)
}

/// Build the application with CORS and rate limiting from configuration
///
/// Health routes get the base stack only, so health checks are never throttled.
pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Router {
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    let health = apply_middleware(health_routes());

    api.merge(health).with_state(state)
}

/// Connect to PostgreSQL and wire the service context
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
    }

    let jwt_service = Arc::new(JwtService::from_config(&config.jwt));
    let service_context = ServiceContext::postgres(pool, jwt_service);

    Ok(AppState::new(
        service_context,
        CookiePolicy::for_environment(config.app.env),
    ))
}

/// Serve `app` on `addr` until the process stops
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    // Peer addresses feed the client IP recorded with each session
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let state = create_app_state(&config).await?;
    let app = create_app_with_config(state, &config);

    run_server(app, &config.api.address()).await
}
