//! Session cookies: `token` (bearer string) and `expiry` (epoch milliseconds)

use crate::session::{self, Session};
use chrono::{DateTime, Utc};

pub const TOKEN_COOKIE: &str = "token";
pub const EXPIRY_COOKIE: &str = "expiry";

const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Iterate `name=value` pairs of a `Cookie` request header
pub fn parse_cookie_header(header: &str) -> impl Iterator<Item = (&str, &str)> {
    header.split(';').filter_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        Some((name.trim(), value.trim()))
    })
}

/// Find a cookie by name in a `Cookie` request header
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    parse_cookie_header(header).find_map(|(k, v)| (k == name).then_some(v))
}

/// `Set-Cookie` value storing a session cookie
pub fn set_cookie(name: &str, value: &str) -> String {
    format!("{name}={value}; Path=/; SameSite=Lax")
}

/// `Set-Cookie` value deleting a cookie by expiring it in the past
pub fn delete_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Expires={EPOCH_EXPIRES}; Max-Age=0")
}

/// Expiry predicate for the `expiry` cookie
///
/// Missing or unparseable values count as expired.
pub fn expiry_elapsed(expiry: Option<&str>, now: DateTime<Utc>) -> bool {
    match expiry.map(session::parse_millis) {
        Some(Ok(expires_at)) => session::remaining_ms(expires_at, now) <= 0,
        _ => true,
    }
}

/// A parsed `Set-Cookie` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieDirective {
    Set { name: String, value: String },
    Delete { name: String },
}

impl CookieDirective {
    /// Interpret a `Set-Cookie` value
    ///
    /// `Max-Age=0` or an `Expires` in the past (relative to `now`) turns the
    /// directive into a deletion.
    pub fn parse(set_cookie: &str, now: DateTime<Utc>) -> Option<Self> {
        let mut parts = set_cookie.split(';');
        let (name, value) = parts.next()?.trim().split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let expired = parts.any(|attr| {
            let Some((key, val)) = attr.trim().split_once('=') else {
                return false;
            };
            let val = val.trim();
            if key.trim().eq_ignore_ascii_case("max-age") {
                val.parse::<i64>().is_ok_and(|age| age <= 0)
            } else if key.trim().eq_ignore_ascii_case("expires") {
                DateTime::parse_from_rfc2822(val).is_ok_and(|at| at.with_timezone(&Utc) <= now)
            } else {
                false
            }
        });

        Some(if expired {
            Self::Delete {
                name: name.to_string(),
            }
        } else {
            Self::Set {
                name: name.to_string(),
                value: value.trim().to_string(),
            }
        })
    }
}

/// The two session cookies as seen on a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies {
    pub token: Option<String>,
    pub expiry: Option<String>,
}

impl SessionCookies {
    /// Read both session cookies from an optional `Cookie` header
    pub fn from_header(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Self::default();
        };

        Self {
            token: find_cookie(header, TOKEN_COOKIE)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            expiry: find_cookie(header, EXPIRY_COOKIE)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        }
    }

    pub fn for_session(session: &Session) -> Self {
        Self {
            token: Some(session.token.clone()),
            expiry: Some(session.expiry_millis().to_string()),
        }
    }

    /// A token is present and its expiry has not elapsed
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.token.is_some() && !expiry_elapsed(self.expiry.as_deref(), now)
    }

    /// `Set-Cookie` values that store both cookies
    pub fn set_cookie_headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(2);
        if let Some(token) = &self.token {
            headers.push(set_cookie(TOKEN_COOKIE, token));
        }
        if let Some(expiry) = &self.expiry {
            headers.push(set_cookie(EXPIRY_COOKIE, expiry));
        }
        headers
    }

    /// `Set-Cookie` values that delete both cookies
    pub fn delete_cookie_headers() -> [String; 2] {
        [delete_cookie(TOKEN_COOKIE), delete_cookie(EXPIRY_COOKIE)]
    }
}
