//! # barkeep-core
//!
//! Domain layer containing the user and refresh-session entities, repository traits,
//! and domain errors. This crate has zero dependencies on infrastructure (database,
//! web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{FavoriteBase, NewRefreshSession, RefreshSession, SessionState, User};
pub use error::DomainError;
pub use traits::{RefreshSessionRepository, RepoResult, UserRepository};
