//! Bearer token authentication for the protected `/api` routes

use crate::error::HttpError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use bankfront_core::UserId;

pub const NO_TOKEN_MESSAGE: &str = "No token provided";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";

/// Identity attached to requests that passed bearer authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Middleware function for bearer authentication
///
/// Inserts [`AuthenticatedUser`] into the request extensions on success.
pub async fn bearer_auth_middleware(
    State(app_state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let token = extract_bearer_token(req.headers())
        .ok_or_else(|| HttpError::Unauthorized(NO_TOKEN_MESSAGE.to_string()))?
        .to_string();

    let id = app_state
        .verifier
        .verify(&token)
        .await
        .ok_or_else(|| HttpError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()))?;

    debug!(user_id = %id, "Bearer token accepted");
    req.extensions_mut().insert(AuthenticatedUser { id });
    Ok(next.run(req).await)
}
