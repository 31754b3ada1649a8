//! Router assembly

use crate::config::Settings;
use crate::error::{Result, ServerError};
use axum::{Json, Router, routing::get};
use bankfront_http::{
    AppState, UpstreamClient,
    middleware::{CORRELATION_ID_HEADER, RouteGuard, correlation_id_middleware, route_guard_middleware},
    routes,
    services::{JwtConfig, JwtService},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa_scalar::{Scalar, Servable as _};

pub const OPENAPI_PATH: &str = "/api/openapi.json";
pub const DOCS_PATH: &str = "/api/docs";

/// Build the shared state from settings
///
/// # Errors
///
/// Returns an error if no JWT secret is configured or the upstream client
/// cannot be built
pub fn build_state(settings: &Settings) -> Result<AppState> {
    let secret = settings
        .auth
        .jwt_secret
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or(ServerError::MissingJwtSecret)?;

    let jwt = JwtService::new(JwtConfig::new(
        secret,
        settings.auth.expiration_hours,
        settings.auth.issuer.clone(),
    ));
    let upstream = UpstreamClient::new(&(&settings.upstream).into())?;

    Ok(AppState::new(
        upstream,
        Arc::new(jwt),
        RouteGuard::new(settings.guard.clone()),
    ))
}

/// Build the complete application router
///
/// Layers, outermost first: request tracing, correlation id, route guard.
pub fn build_app(settings: &Settings, state: AppState) -> Router {
    let (api_router, api) = routes::router(state.clone());

    let mut router = api_router
        .route(OPENAPI_PATH, get({
            let api = api.clone();
            move || async move { Json(api) }
        }))
        .merge(Scalar::with_url(DOCS_PATH, api));

    if let Some(static_dir) = &settings.server.static_dir {
        if static_dir.is_dir() {
            info!(dir = %static_dir.display(), "Serving static files");
            let index = static_dir.join("index.html");
            let fallback = if index.exists() {
                index
            } else {
                static_dir.join("404.html")
            };
            router = router.fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(fallback)));
        } else {
            warn!(
                dir = %static_dir.display(),
                "Static directory does not exist, skipping static file serving"
            );
        }
    }

    let mut router = router
        .layer(axum::middleware::from_fn_with_state(
            state,
            route_guard_middleware,
        ))
        .layer(axum::middleware::from_fn(correlation_id_middleware))
        .layer(TraceLayer::new_for_http());

    if settings.server.cors_enabled {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(vec![
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                    axum::http::HeaderName::from_static(CORRELATION_ID_HEADER),
                ])
                .expose_headers(vec![axum::http::HeaderName::from_static(
                    CORRELATION_ID_HEADER,
                )]),
        );
    }

    router
}
