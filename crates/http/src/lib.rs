//! Bankfront HTTP module providing the route guard, bearer authentication
//! and the `/api` proxy handlers
//!
//! The `server` feature builds the axum side; the `client` feature provides a
//! typed client for the same API that keeps its session in a
//! [`bankfront_core::SessionStore`].

#[macro_use]
extern crate tracing;

pub mod types;

#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod state;
#[cfg(feature = "server")]
pub mod upstream;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "server")]
pub use error::{HttpError, Result};
#[cfg(feature = "server")]
pub use state::AppState;
#[cfg(feature = "server")]
pub use upstream::{UpstreamClient, UpstreamConfig};
