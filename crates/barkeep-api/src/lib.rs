//! # barkeep-api
//!
//! HTTP API server built with Axum. Reads credentials from cookies or the
//! `Authorization` header and writes them back as HttpOnly cookies.

pub mod cookies;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, create_app_with_config, run};
pub use state::AppState;
