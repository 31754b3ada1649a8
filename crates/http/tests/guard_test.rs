//! Tests for the cookie route guard in front of the router

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use common::{app, app_state, body_text};
use tower::ServiceExt;

fn page(uri: &str, cookie: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn expiry_in(offset: Duration) -> String {
    (Utc::now() + offset).timestamp_millis().to_string()
}

fn set_cookies(response: &axum::response::Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_protected_page_without_token_redirects_and_clears() {
    let response = app(app_state("http://127.0.0.1:1"))
        .oneshot(page("/dashboard", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/login");

    let cleared = set_cookies(&response);
    assert_eq!(cleared.len(), 2);
    assert!(cleared[0].starts_with("token=;"));
    assert!(cleared[1].starts_with("expiry=;"));
    assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));
}

#[tokio::test]
async fn test_nested_and_admin_paths_are_protected() {
    let app = app(app_state("http://127.0.0.1:1"));
    for uri in ["/dashboard/cards", "/admin"] {
        let response = app.clone().oneshot(page(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{uri}");
    }
}

#[tokio::test]
async fn test_expired_cookie_redirects() {
    let cookie = format!("token=abc; expiry={}", expiry_in(Duration::minutes(-1)));
    let response = app(app_state("http://127.0.0.1:1"))
        .oneshot(page("/dashboard", Some(cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(set_cookies(&response).len(), 2);
}

#[tokio::test]
async fn test_garbled_expiry_redirects() {
    let response = app(app_state("http://127.0.0.1:1"))
        .oneshot(page("/dashboard", Some("token=abc; expiry=soon".to_string())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_active_session_passes() {
    let cookie = format!("token=abc; expiry={}", expiry_in(Duration::hours(1)));
    let response = app(app_state("http://127.0.0.1:1"))
        .oneshot(page("/dashboard", Some(cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(body_text(response).await, "dashboard");
}

#[tokio::test]
async fn test_public_pages_pass_without_cookies() {
    let app = app(app_state("http://127.0.0.1:1"));
    for (uri, body) in [("/about", "about"), ("/login", "login")] {
        let response = app.clone().oneshot(page(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, body);
    }
}

#[tokio::test]
async fn test_alternate_spellings_of_protected_paths_redirect() {
    let app = app(app_state("http://127.0.0.1:1"));
    for uri in ["//dashboard/", "/%64ashboard/", "/./dashboard/", "/about/../admin"] {
        let response = app.clone().oneshot(page(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{uri}");
        assert_eq!(set_cookies(&response).len(), 2, "{uri}");
    }
}
