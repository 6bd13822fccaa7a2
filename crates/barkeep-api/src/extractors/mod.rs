//! Axum extractors for request handling
//!
//! Credential lookup, authentication, client metadata, and validated bodies.

mod auth;
mod client;
mod credentials;
mod validated;

pub use auth::AuthUser;
pub use client::ClientInfo;
pub use credentials::SessionCredentials;
pub use validated::ValidatedJson;
