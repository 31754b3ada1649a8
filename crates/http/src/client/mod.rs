//! Bankfront portal client
//!
//! Talks to the portal the way the browser does: the bearer token and the
//! session cookies come from a [`SessionStore`], and `Set-Cookie` answers are
//! applied back to it.

pub mod account;
pub mod auth;
pub mod error;

use crate::types::ErrorResponse;
use bankfront_core::{MemorySessionStore, SessionStore};
use chrono::Utc;
use error::ClientError;
use reqwest::{Client, ClientBuilder, Response, header, redirect};
use std::sync::Arc;
use std::time::Duration;

/// Bankfront API client
#[derive(Clone)]
pub struct PortalClient {
    client: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl PortalClient {
    /// Create a new client with an in-memory session store
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> PortalClientBuilder {
        PortalClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The store holding this client's session
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Create a request builder carrying the stored credentials
    pub fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        let record = self.store.snapshot()?;
        if let Some(token) = record.local_token() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(cookies) = record.cookie_header() {
            request = request.header(header::COOKIE, cookies);
        }

        Ok(request)
    }

    /// Send a request and apply any `Set-Cookie` answers to the store
    pub async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;

        let set_cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();

        if !set_cookies.is_empty() {
            let now = Utc::now();
            let mut record = self.store.snapshot()?;
            for set_cookie in &set_cookies {
                record.apply_set_cookie(set_cookie, now);
            }
            self.store.replace(record)?;
        }

        Ok(response)
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}

/// Builder for PortalClient
#[derive(Default)]
pub struct PortalClientBuilder {
    base_url: Option<String>,
    store: Option<Arc<dyn SessionStore>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl PortalClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Keep the session in the given store
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<PortalClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        // Redirects are surfaced to the caller so guard rejections stay visible
        let mut client_builder = ClientBuilder::new().redirect(redirect::Policy::none());

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        client_builder = client_builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| concat!("bankfront-client/", env!("CARGO_PKG_VERSION")).to_string()),
        );

        let client = client_builder.build()?;

        Ok(PortalClient {
            client,
            base_url,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
        })
    }
}
