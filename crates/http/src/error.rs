//! HTTP error types and implementations

use crate::types::ErrorResponse;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Message returned for any local fault
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// HTTP-specific errors
///
/// Every variant renders as a `{"error": "..."}` body.
#[derive(Error, Debug)]
pub enum HttpError {
    /// Missing or rejected credential
    #[error("{0}")]
    Unauthorized(String),

    /// Malformed or invalid request payload
    #[error("{0}")]
    BadRequest(String),

    /// Non-2xx answer from the upstream backend, relayed as-is
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// Unexpected local fault; the detail is logged, never returned
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            Self::InternalServerError(detail) => {
                error!("Request failed: {}", detail);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            Self::Unauthorized(message)
            | Self::BadRequest(message)
            | Self::Upstream { message, .. } => message,
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type alias using HttpError
pub type Result<T> = std::result::Result<T, HttpError>;
