//! Cookie-based route guard
//!
//! Runs before routing on every request. Paths under a protected prefix need
//! a `token` cookie and an `expiry` cookie that has not elapsed; otherwise
//! both cookies are deleted and the request is redirected to the login page.

use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use bankfront_core::{Clock, SessionCookies, SystemClock};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Guard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Path prefixes that require an active session
    pub protected_prefixes: Vec<String>,
    /// Where rejected navigations are sent
    pub login_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: vec!["/dashboard".to_string(), "/admin".to_string()],
            login_path: "/login".to_string(),
        }
    }
}

impl GuardConfig {
    /// Whether a request path falls under a protected prefix
    ///
    /// The path is normalized first so that spellings a file server resolves
    /// to the same page (`//dashboard`, `/%64ashboard`, `/./dashboard`) are
    /// matched too. Paths that cannot be decoded are treated as protected.
    pub fn is_protected(&self, path: &str) -> bool {
        let Some(path) = normalize_path(path) else {
            return true;
        };
        self.protected_prefixes.iter().any(|prefix| {
            let prefix = normalize_path(prefix).unwrap_or_else(|| prefix.clone());
            path.len() >= prefix.len()
                && path.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
        })
    }
}

/// Percent-decode a path and resolve its empty, `.` and `..` segments
///
/// Returns `None` when the escapes do not decode to UTF-8.
pub fn normalize_path(path: &str) -> Option<String> {
    let decoded = urlencoding::decode(path).ok()?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    Some(format!("/{}", segments.join("/")))
}

/// What the guard does with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    Redirect,
}

/// Route guard over the session cookies
pub struct RouteGuard {
    config: GuardConfig,
    clock: Arc<dyn Clock>,
}

impl RouteGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Decide a request from its path and cookies
    pub fn evaluate(&self, path: &str, cookies: &SessionCookies) -> GuardDecision {
        decide(&self.config, path, cookies, self.clock.now())
    }

    /// Redirect to login that also deletes both session cookies
    pub fn reject(&self) -> Response {
        let mut response = Redirect::temporary(&self.config.login_path).into_response();
        for cookie in SessionCookies::delete_cookie_headers() {
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

/// Pure guard decision
pub fn decide(
    config: &GuardConfig,
    path: &str,
    cookies: &SessionCookies,
    now: DateTime<Utc>,
) -> GuardDecision {
    if !config.is_protected(path) || cookies.is_active(now) {
        GuardDecision::Pass
    } else {
        GuardDecision::Redirect
    }
}

/// Middleware function for the route guard
pub async fn route_guard_middleware(
    State(app_state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let cookies = SessionCookies::from_header(
        req.headers()
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok()),
    );

    match app_state.guard.evaluate(req.uri().path(), &cookies) {
        GuardDecision::Pass => next.run(req).await,
        GuardDecision::Redirect => {
            info!(
                path = %req.uri().path(),
                has_token = cookies.token.is_some(),
                "Rejecting protected navigation without an active session"
            );
            app_state.guard.reject()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Duration;

    fn cookies(token: Option<&str>, expiry: Option<String>) -> SessionCookies {
        SessionCookies {
            token: token.map(str::to_string),
            expiry,
        }
    }

    #[test]
    fn prefixes_match() {
        let config = GuardConfig::default();
        assert!(config.is_protected("/dashboard"));
        assert!(config.is_protected("/dashboard/cards"));
        assert!(config.is_protected("/admin/users"));
        assert!(!config.is_protected("/"));
        assert!(!config.is_protected("/about"));
        assert!(!config.is_protected("/api/card/status"));
    }

    #[test]
    fn equivalent_spellings_are_protected() {
        let config = GuardConfig::default();
        for path in [
            "//dashboard/",
            "/%64ashboard/",
            "/./dashboard/",
            "/dashboard/./cards",
            "/about/../dashboard",
            "/%2Fdashboard",
            "/DASHBOARD",
            "/%61dmin",
            "/%ff%fe",
        ] {
            assert!(config.is_protected(path), "{path}");
        }
        assert!(!config.is_protected("//about"));
        assert!(!config.is_protected("/%61bout"));
    }

    #[test]
    fn paths_normalize() {
        assert_eq!(normalize_path("//dashboard/").as_deref(), Some("/dashboard"));
        assert_eq!(normalize_path("/a/./b/../c").as_deref(), Some("/a/c"));
        assert_eq!(normalize_path("/../..").as_deref(), Some("/"));
        assert_eq!(normalize_path("/%64ashboard").as_deref(), Some("/dashboard"));
        assert_eq!(normalize_path("/%ff"), None);
    }

    #[test]
    fn decisions() {
        let config = GuardConfig::default();
        let now = Utc::now();
        let future = Some((now + Duration::hours(1)).timestamp_millis().to_string());
        let past = Some((now - Duration::hours(1)).timestamp_millis().to_string());

        assert_eq!(
            decide(&config, "/dashboard", &cookies(Some("t"), future.clone()), now),
            GuardDecision::Pass
        );
        assert_eq!(
            decide(&config, "/dashboard", &cookies(None, future), now),
            GuardDecision::Redirect
        );
        assert_eq!(
            decide(&config, "/admin", &cookies(Some("t"), past), now),
            GuardDecision::Redirect
        );
        assert_eq!(
            decide(&config, "/dashboard", &cookies(Some("t"), None), now),
            GuardDecision::Redirect
        );
        assert_eq!(
            decide(&config, "/contact", &SessionCookies::default(), now),
            GuardDecision::Pass
        );
    }

    #[test]
    fn rejection_redirects_and_deletes_cookies() {
        let guard = RouteGuard::new(GuardConfig {
            protected_prefixes: vec!["/vault".to_string()],
            login_path: "/signin".to_string(),
        });
        let response = guard.reject();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/signin");

        let set_cookies: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(set_cookies.len(), 2);
        assert!(set_cookies[0].starts_with("token=;"));
        assert!(set_cookies[1].starts_with("expiry=;"));
        assert!(set_cookies.iter().all(|c| c.contains("Expires=Thu, 01 Jan 1970")));
    }
}
