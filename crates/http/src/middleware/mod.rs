//! Middleware components for HTTP request processing

pub mod auth;
pub mod correlation;
pub mod guard;

pub use auth::{AuthenticatedUser, bearer_auth_middleware, extract_bearer_token};
pub use correlation::{
    CORRELATION_ID_HEADER, CorrelationId, correlation_id_middleware,
    extract_correlation_id,
};
pub use guard::{GuardConfig, GuardDecision, RouteGuard, route_guard_middleware};
