//! Auth proxy endpoints
//!
//! Each handler validates its declared schema and forwards the body to the
//! matching upstream route, relaying the upstream status and JSON.

use crate::{
    error::HttpError,
    state::AppState,
    types::{
        ErrorResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    },
    upstream::AuthForward,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use tracing::instrument;
use utoipa_axum::{router::OpenApiRouter, routes};

async fn forward<B: AuthForward>(
    app_state: &AppState,
    payload: Result<Json<B>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(body) = payload?;
    body.validate()?;

    let reply = app_state.upstream.forward(&body).await?;
    Ok((reply.status, Json(reply.body)).into_response())
}

/// Log in through the upstream backend
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Upstream login response, relayed"),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Rejected by upstream", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(name = "auth_login", skip_all)]
pub async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    forward(&app_state, payload).await
}

/// Register a new customer through the upstream backend
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Upstream registration response, relayed"),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(name = "auth_register", skip_all)]
pub async fn register(
    State(app_state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    forward(&app_state, payload).await
}

/// Request a password-reset email
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Upstream response, relayed"),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(name = "auth_forgot_password", skip_all)]
pub async fn forgot_password(
    State(app_state): State<AppState>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    forward(&app_state, payload).await
}

/// Set a new password using a reset token
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Upstream response, relayed"),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(name = "auth_reset_password", skip_all)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    forward(&app_state, payload).await
}

/// Create the auth proxy router
pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(register))
        .routes(routes!(forgot_password))
        .routes(routes!(reset_password))
}
