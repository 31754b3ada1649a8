//! Client for the upstream authentication backend
//!
//! Auth routes are forwarded one-to-one: `POST /api/auth/<name>` here becomes
//! `POST {base_url}/api/auth/<name>` upstream. No retries.

use crate::error::HttpError;
use crate::types::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest};
use axum::http::StatusCode;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::time::Duration;

/// Upstream backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the backend service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Upstream auth operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEndpoint {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
}

impl AuthEndpoint {
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::ForgotPassword => "forgot-password",
            Self::ResetPassword => "reset-password",
        }
    }

    /// Message used when the upstream fails without saying why
    pub fn fallback_error(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
            Self::ForgotPassword => "Failed to send reset email",
            Self::ResetPassword => "Password reset failed",
        }
    }
}

impl fmt::Display for AuthEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request body with a declared upstream route
pub trait AuthForward: Serialize + Send + Sync {
    const ENDPOINT: AuthEndpoint;

    /// Boundary checks beyond what deserialization enforces
    fn validate(&self) -> Result<(), HttpError>;
}

fn require(fields: &[&str], message: &str) -> Result<(), HttpError> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(HttpError::BadRequest(message.to_string()));
    }
    Ok(())
}

impl AuthForward for LoginRequest {
    const ENDPOINT: AuthEndpoint = AuthEndpoint::Login;

    fn validate(&self) -> Result<(), HttpError> {
        require(&[self.email.as_str(), self.password.as_str()], "Email and password are required")
    }
}

impl AuthForward for RegisterRequest {
    const ENDPOINT: AuthEndpoint = AuthEndpoint::Register;

    fn validate(&self) -> Result<(), HttpError> {
        require(&[self.email.as_str(), self.password.as_str()], "Email and password are required")
    }
}

impl AuthForward for ForgotPasswordRequest {
    const ENDPOINT: AuthEndpoint = AuthEndpoint::ForgotPassword;

    fn validate(&self) -> Result<(), HttpError> {
        require(&[self.email.as_str()], "Email is required")
    }
}

impl AuthForward for ResetPasswordRequest {
    const ENDPOINT: AuthEndpoint = AuthEndpoint::ResetPassword;

    fn validate(&self) -> Result<(), HttpError> {
        require(&[self.token.as_str(), self.password.as_str()], "Token and password are required")
    }
}

/// Successful upstream answer
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: JsonValue,
}

/// Pull a human-readable message out of an upstream error body
pub fn upstream_message(body: &JsonValue) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| {
            body.get(key)
                .and_then(JsonValue::as_str)
                .filter(|m| !m.is_empty())
        })
        .map(str::to_string)
}

/// HTTP client for the upstream backend
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a new upstream client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &UpstreamConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                HttpError::InternalServerError(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: AuthEndpoint) -> String {
        format!("{}/api/auth/{}", self.base_url, endpoint.name())
    }

    /// Forward a validated request body to its upstream route
    ///
    /// # Errors
    ///
    /// - [`HttpError::Upstream`] with the upstream status for non-2xx answers
    /// - [`HttpError::InternalServerError`] for transport failures and
    ///   unreadable success bodies
    pub async fn forward<B: AuthForward>(&self, body: &B) -> Result<UpstreamReply, HttpError> {
        let endpoint = B::ENDPOINT;
        let url = self.endpoint_url(endpoint);
        debug!(%endpoint, %url, "Forwarding auth request upstream");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| HttpError::InternalServerError(format!("{endpoint} request failed: {e}")))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            HttpError::InternalServerError(format!("{endpoint} response unreadable: {e}"))
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<JsonValue>(&bytes)
                .ok()
                .as_ref()
                .and_then(upstream_message)
                .unwrap_or_else(|| endpoint.fallback_error().to_string());
            warn!(%endpoint, status = status.as_u16(), "Upstream rejected request: {}", message);
            return Err(HttpError::Upstream { status, message });
        }

        let body = serde_json::from_slice(&bytes).map_err(|e| {
            HttpError::InternalServerError(format!("{endpoint} returned invalid JSON: {e}"))
        })?;

        Ok(UpstreamReply { status, body })
    }
}
