//! # barkeep-service
//!
//! Application layer: the session lifecycle manager, its dependency
//! container, and request/response DTOs.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use services::{ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, SessionService};
