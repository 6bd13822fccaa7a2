//! Data transfer objects for the session endpoints
//!
//! - Request DTOs with validation for API inputs
//! - Response DTOs and the values handed back to the transport layer

pub mod requests;
pub mod responses;

pub use requests::{ClientMeta, LoginRequest, RegisterRequest};
pub use responses::{
    AccessGrant, HealthResponse, IssuedSession, ReadinessResponse, SessionIdentity, UserProfile,
};
