//! JWT service backing bearer token verification

use crate::error::HttpError;
use async_trait::async_trait;
use bankfront_core::{TokenVerifier, UserId};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (as UTC timestamp)
    pub exp: i64,
    /// Issued at (as UTC timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

/// JWT service configuration
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// Secret shared with the upstream backend that issues tokens
    pub secret: String,
    /// Lifetime of tokens minted by [`JwtService::generate_token`]
    pub expiration: Duration,
    /// Token issuer
    pub issuer: String,
}

impl JwtConfig {
    pub fn new(secret: String, expiration_hours: i64, issuer: String) -> Self {
        Self {
            secret,
            expiration: Duration::hours(expiration_hours),
            issuer,
        }
    }
}

/// JWT service for token operations
pub struct JwtService {
    config: Arc<JwtConfig>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config: Arc::new(config),
            encoding_key,
            decoding_key,
        }
    }

    /// Generate a JWT token for a user
    pub fn generate_token(&self, user_id: &str) -> Result<String, HttpError> {
        let now = Utc::now();
        let expiration = now + self.config.expiration;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| HttpError::InternalServerError(format!("Failed to generate token: {e}")))
    }

    /// Validate a JWT token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, HttpError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(std::slice::from_ref(&self.config.issuer));

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    HttpError::Unauthorized("Token has expired".to_string())
                }
                _ => HttpError::Unauthorized(format!("Token validation failed: {e}")),
            })
    }
}

#[async_trait]
impl TokenVerifier for JwtService {
    async fn verify(&self, token: &str) -> Option<UserId> {
        match self.validate_token(token) {
            Ok(claims) => Some(claims.sub),
            Err(e) => {
                debug!("Rejected bearer token: {}", e);
                None
            }
        }
    }
}
