//! Integration tests for the Bankfront portal client

#![cfg(feature = "client")]

use bankfront_core::{FileSessionStore, MemorySessionStore, SessionStore};
use bankfront_http::client::{PortalClient, account::PageOutcome, error::ClientError};
use bankfront_http::types::{CardPaymentRequest, CardType, LoginRequest};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn logged_in(server: &MockServer) -> (PortalClient, Arc<MemorySessionStore>) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-abc",
            "expiresAt": 1_900_000_000_000i64
        })))
        .mount(server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let client = PortalClient::builder()
        .base_url(server.uri())
        .session_store(store.clone())
        .build()
        .unwrap();
    client
        .login(&LoginRequest::new("ada@bank.test", "pw"))
        .await
        .unwrap();
    (client, store)
}

#[tokio::test]
async fn test_client_builder() {
    let client = PortalClient::builder()
        .base_url("http://localhost:8080/")
        .build()
        .unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = PortalClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_login_saves_session_in_both_locations() {
    let server = MockServer::start().await;
    let (_client, store) = logged_in(&server).await;

    let record = store.snapshot().unwrap();
    assert_eq!(record.local_token().as_deref(), Some("tok-abc"));
    assert_eq!(
        record.local.get("expires_at").map(String::as_str),
        Some("2030-03-17T17:46:40.000Z")
    );
    assert_eq!(record.cookies.get("token").map(String::as_str), Some("tok-abc"));
    assert_eq!(
        record.cookies.get("expiry").map(String::as_str),
        Some("1900000000000")
    );
}

#[tokio::test]
async fn test_login_failure_surfaces_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "bad creds"})))
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let client = PortalClient::builder()
        .base_url(server.uri())
        .session_store(store.clone())
        .build()
        .unwrap();

    let err = client
        .login(&LoginRequest::new("ada@bank.test", "nope"))
        .await
        .unwrap_err();
    match err {
        ClientError::AuthenticationFailed(message) => assert_eq!(message, "bad creds"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let server = MockServer::start().await;
    let (client, _store) = logged_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/card/apply"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Application for physical_credit card received and is being processed."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client.apply_card(CardType::PhysicalCredit).await.unwrap();
    assert!(response.success);
    assert!(response.message.contains("physical_credit"));
}

#[tokio::test]
async fn test_payment_validation_error() {
    let server = MockServer::start().await;
    let (client, _store) = logged_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/card/payment"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Payment method and transaction ID are required"
        })))
        .mount(&server)
        .await;

    let err = client
        .card_payment(&CardPaymentRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::BadRequest(m) if m.contains("transaction ID")));
}

#[tokio::test]
async fn test_guard_redirect_clears_cookies() {
    let server = MockServer::start().await;
    let (client, store) = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/dashboard"))
        .respond_with(
            ResponseTemplate::new(307)
                .insert_header("location", "/login")
                .append_header(
                    "set-cookie",
                    "token=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0",
                )
                .append_header(
                    "set-cookie",
                    "expiry=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0",
                ),
        )
        .mount(&server)
        .await;

    let outcome = client.fetch_page("/dashboard").await.unwrap();
    assert_eq!(
        outcome,
        PageOutcome::Redirected {
            location: "/login".to_string()
        }
    );
    assert!(store.snapshot().unwrap().cookies.is_empty());
}

#[tokio::test]
async fn test_logout_clears_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path().join("session.json")));

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-file",
            "expires_at": "2030-03-17T17:46:40.000Z"
        })))
        .mount(&server)
        .await;

    let client = PortalClient::builder()
        .base_url(server.uri())
        .session_store(store.clone())
        .build()
        .unwrap();
    client
        .login(&LoginRequest::new("ada@bank.test", "pw"))
        .await
        .unwrap();
    assert!(store.load().unwrap().is_some());

    client.logout().unwrap();
    let record = store.snapshot().unwrap();
    assert!(record.local.is_empty());
    assert!(record.cookies.is_empty());
}
