//! Application state
//!
//! Holds the shared state for the Axum application: the service context and
//! the cookie policy.

use std::sync::Arc;

use barkeep_service::ServiceContext;

use crate::cookies::CookiePolicy;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// How session cookies are written
    cookie_policy: CookiePolicy,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: ServiceContext, cookie_policy: CookiePolicy) -> Self {
        Self {
            service_context: Arc::new(service_context),
            cookie_policy,
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the cookie policy
    pub fn cookie_policy(&self) -> &CookiePolicy {
        &self.cookie_policy
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("cookie_policy", &self.cookie_policy)
            .finish()
    }
}
