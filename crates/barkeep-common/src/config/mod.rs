//! Configuration structs

mod app_config;

pub use app_config::{
    parse_ttl, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    JwtConfig, RateLimitConfig, ServerConfig, MAX_TTL_SECONDS,
};
