//! # barkeep-common
//!
//! Shared utilities including configuration, error handling, credential signing,
//! password hashing, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    hash_password, hash_refresh_token, verify_password, AccessClaims, Claims, JwtService,
    PasswordService, RefreshClaims, TokenType,
};
pub use config::{
    parse_ttl, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    JwtConfig, RateLimitConfig, ServerConfig, MAX_TTL_SECONDS,
};
pub use error::{
    AppError, AppResult, AuthFailure, ErrorResponse, FieldViolation, ValidationIssues,
    AUTH_FAILED_MESSAGE,
};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
