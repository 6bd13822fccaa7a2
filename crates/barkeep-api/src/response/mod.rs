//! Response envelope and error handling for API endpoints
//!
//! Every endpoint answers with `{ok, message?, user?, rotated?}`. Errors are
//! always `{ok: false, message}` where the message is safe for clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use barkeep_common::{AppError, AuthFailure};
use barkeep_service::ServiceError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),

    /// Body could not be read as the expected JSON shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::App(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message shown to the client
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::App(e) => e.public_message(),
            Self::InvalidBody(_) => "Invalid request body".to_string(),
        }
    }

    /// Create an invalid body error
    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::InvalidBody(msg.into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::App(err.into())
    }
}

impl From<AuthFailure> for ApiError {
    fn from(failure: AuthFailure) -> Self {
        Self::App(AppError::auth(failure))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::App(errors.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = ?self, "Server error occurred");
        }

        (status, Json(Envelope::error(self.public_message()))).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// Response body shared by all endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<U = ()> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<U>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotated: Option<bool>,
}

impl Envelope {
    /// `{ok: true}`
    pub fn ok() -> Self {
        Self {
            ok: true,
            message: None,
            user: None,
            rotated: None,
        }
    }

    /// `{ok: false, message}`
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            user: None,
            rotated: None,
        }
    }

    /// Successful refresh; the refresh token itself is never rotated
    pub fn refreshed() -> Self {
        Self {
            rotated: Some(false),
            ..Self::ok()
        }
    }
}

impl<U> Envelope<U> {
    /// `{ok: true, user}`
    pub fn with_user(user: U) -> Self {
        Self {
            ok: true,
            message: None,
            user: Some(user),
            rotated: None,
        }
    }
}

/// Created response (201)
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = self.0.into_response();
        *response.status_mut() = StatusCode::CREATED;
        response
    }
}
