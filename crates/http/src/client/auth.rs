//! Authentication API client methods

use super::{ClientError, PortalClient};
use crate::types::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest};
use bankfront_core::{Session, session};
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

impl PortalClient {
    /// Log in and keep the returned session in the store
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Session, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/api/auth/login")?
            .json(credentials);
        let body: JsonValue = self.execute(req).await?;

        let session = session_from_login(&body)?;
        self.store.save(&session)?;
        info!(expires_at = %session.expiry_iso(), "Logged in");
        Ok(session)
    }

    /// Drop the stored session
    pub fn logout(&self) -> Result<(), ClientError> {
        self.store.clear()?;
        Ok(())
    }

    /// Register a new customer
    pub async fn register(&self, request: &RegisterRequest) -> Result<JsonValue, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/api/auth/register")?
            .json(request);
        self.execute(req).await
    }

    /// Ask for a password reset email
    pub async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<JsonValue, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/api/auth/forgot-password")?
            .json(request);
        self.execute(req).await
    }

    /// Set a new password using a reset token
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<JsonValue, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/api/auth/reset-password")?
            .json(request);
        self.execute(req).await
    }
}

/// Read `token` and `expiresAt` (or `expires_at`) from a login answer
pub fn session_from_login(body: &JsonValue) -> Result<Session, ClientError> {
    let token = body
        .get("token")
        .and_then(JsonValue::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ClientError::InvalidResponse("login response has no token".into()))?;

    let expiry = body
        .get("expiresAt")
        .or_else(|| body.get("expires_at"))
        .ok_or_else(|| ClientError::InvalidResponse("login response has no expiry".into()))?;

    Ok(Session::new(token, parse_expiry(expiry)?))
}

fn parse_expiry(value: &JsonValue) -> Result<DateTime<Utc>, ClientError> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .ok_or_else(|| ClientError::InvalidResponse(format!("bad expiry {n}")))
            .and_then(|ms| session::from_millis(ms).map_err(ClientError::from)),
        JsonValue::String(s) if s.bytes().all(|b| b.is_ascii_digit()) => {
            session::parse_millis(s).map_err(ClientError::from)
        }
        JsonValue::String(s) => session::parse_iso(s).map_err(ClientError::from),
        other => Err(ClientError::InvalidResponse(format!("bad expiry {other}"))),
    }
}
