//! Bearer token verification seam

use async_trait::async_trait;

/// Identifier of the user a verified token belongs to
pub type UserId = String;

/// Decides whether a bearer token is valid
///
/// Handlers never inspect tokens themselves; they ask an implementation of
/// this trait and treat `None` as an invalid token.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Option<UserId>;
}
