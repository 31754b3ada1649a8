//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::Request,
    response::Response,
    routing::get,
};
use bankfront_http::{
    AppState, UpstreamClient, UpstreamConfig,
    middleware::{GuardConfig, RouteGuard, route_guard_middleware},
    routes,
    services::{JwtConfig, JwtService},
};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_ISSUER: &str = "bankfront";

pub fn jwt_service() -> JwtService {
    JwtService::new(JwtConfig::new(
        TEST_SECRET.to_string(),
        1,
        TEST_ISSUER.to_string(),
    ))
}

pub fn app_state(upstream_url: &str) -> AppState {
    let upstream = UpstreamClient::new(&UpstreamConfig {
        base_url: upstream_url.to_string(),
        timeout_seconds: 5,
    })
    .unwrap();
    AppState::new(
        upstream,
        Arc::new(jwt_service()),
        RouteGuard::new(GuardConfig::default()),
    )
}

/// API routes plus a couple of pages, all behind the route guard
pub fn app(state: AppState) -> Router {
    let (api, _openapi) = routes::router(state.clone());
    Router::new()
        .route("/dashboard", get(|| async { "dashboard" }))
        .route("/dashboard/cards", get(|| async { "cards" }))
        .route("/admin", get(|| async { "admin" }))
        .route("/about", get(|| async { "about" }))
        .route("/login", get(|| async { "login" }))
        .merge(api)
        .layer(axum::middleware::from_fn_with_state(
            state,
            route_guard_middleware,
        ))
}

pub fn json_request(method: &str, uri: &str, body: &JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
