//! Request DTOs for the session endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use std::borrow::Cow;

use barkeep_core::entities::FavoriteBase;
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Display name is required"))]
    pub display_name: String,

    #[validate(custom(function = "validate_favorite_base"))]
    pub favorite_base: String,
}

impl RegisterRequest {
    /// Parsed favorite base; only meaningful after `validate` passed
    pub fn favorite_base(&self) -> Option<FavoriteBase> {
        self.favorite_base.parse().ok()
    }
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Client details recorded with a new refresh session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMeta {
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

impl ClientMeta {
    pub fn new(user_agent: Option<String>, ip: Option<String>) -> Self {
        Self { user_agent, ip }
    }
}

fn validate_favorite_base(value: &str) -> Result<(), ValidationError> {
    if value.parse::<FavoriteBase>().is_ok() {
        return Ok(());
    }
    Err(ValidationError::new("favorite_base").with_message(Cow::Borrowed(
        "Favorite base must be one of RON, TEQUILA, WHISKY, GIN, VODKA, BRANDY, NA",
    )))
}
