//! End-to-end tests for the assembled application router

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use bankfront_server::{ServerError, Settings, build_app, build_state};
use serde_json::{Value as JsonValue, json};
use std::path::Path;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(upstream: &str, static_dir: Option<&Path>) -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = Some("server-test-secret".to_string());
    settings.upstream.base_url = upstream.to_string();
    settings.server.static_dir = static_dir.map(Path::to_path_buf);
    settings
}

fn app(settings: &Settings) -> Router {
    let state = build_state(settings).unwrap();
    build_app(settings, state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn static_site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
    std::fs::write(dir.path().join("about.html"), "<h1>about</h1>").unwrap();
    dir
}

#[test]
fn test_missing_jwt_secret_is_rejected() {
    let settings = Settings::default();
    assert!(matches!(
        build_state(&settings),
        Err(ServerError::MissingJwtSecret)
    ));
}

#[tokio::test]
async fn test_health_and_correlation_header() {
    let response = app(&settings("http://127.0.0.1:1", None))
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-correlation-id"));
    let body: JsonValue = serde_json::from_str(&text(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_lists_api_routes() {
    let response = app(&settings("http://127.0.0.1:1", None))
        .oneshot(get("/api/openapi.json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc: JsonValue = serde_json::from_str(&text(response).await).unwrap();
    for route in [
        "/api/auth/login",
        "/api/auth/register",
        "/api/auth/forgot-password",
        "/api/auth/reset-password",
        "/api/account/info",
        "/api/card/status",
        "/api/card/apply",
        "/api/card/payment",
    ] {
        assert!(doc["paths"].get(route).is_some(), "missing {route}");
    }
}

#[tokio::test]
async fn test_static_pages_and_guard() {
    let site = static_site();
    let app = app(&settings("http://127.0.0.1:1", Some(site.path())));

    let about = app.clone().oneshot(get("/about.html")).await.unwrap();
    assert_eq!(about.status(), StatusCode::OK);
    assert_eq!(text(about).await, "<h1>about</h1>");

    let denied = app.clone().oneshot(get("/dashboard")).await.unwrap();
    assert_eq!(denied.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(denied.headers()[header::LOCATION], "/login");
    assert!(denied.headers().contains_key("x-correlation-id"));

    let far_future = "token=abc; expiry=4102444800000";
    let allowed = app
        .oneshot(
            Request::builder()
                .uri("/dashboard")
                .header(header::COOKIE, far_future)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(text(allowed).await, "<h1>home</h1>");
}

#[tokio::test]
async fn test_static_fallback_cannot_bypass_guard() {
    let site = static_site();
    std::fs::create_dir(site.path().join("dashboard")).unwrap();
    std::fs::write(site.path().join("dashboard").join("index.html"), "<h1>private</h1>").unwrap();
    let app = app(&settings("http://127.0.0.1:1", Some(site.path())));

    for uri in ["/dashboard/", "//dashboard/", "/%64ashboard/", "/./dashboard/"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{uri}");
        assert_eq!(response.headers()[header::LOCATION], "/login");
        assert!(!text(response).await.contains("private"), "{uri}");
    }
}

#[tokio::test]
async fn test_login_is_proxied_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "locked"})))
        .mount(&upstream)
        .await;

    let response = app(&settings(&upstream.uri(), None))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": "ada@bank.test", "password": "pw"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: JsonValue = serde_json::from_str(&text(response).await).unwrap();
    assert_eq!(body, json!({"error": "locked"}));
}
