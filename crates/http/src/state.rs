//! Application state management

use crate::middleware::guard::RouteGuard;
use crate::upstream::UpstreamClient;
use bankfront_core::TokenVerifier;
use std::sync::Arc;

/// Shared application state
///
/// Everything in here is immutable after startup; handlers only read from it
/// and from their own request.
#[derive(Clone)]
pub struct AppState {
    /// Client for the upstream auth backend
    pub upstream: Arc<UpstreamClient>,
    /// Bearer token verification
    pub verifier: Arc<dyn TokenVerifier>,
    /// Cookie-based route protection
    pub guard: Arc<RouteGuard>,
}

impl AppState {
    pub fn new(
        upstream: UpstreamClient,
        verifier: Arc<dyn TokenVerifier>,
        guard: RouteGuard,
    ) -> Self {
        Self {
            upstream: Arc::new(upstream),
            verifier,
            guard: Arc::new(guard),
        }
    }
}
