//! Session persistence
//!
//! A session lives in two places at once, mirroring the browser: local
//! persisted fields (`token`, `expires_at` as ISO-8601) and cookies (`token`,
//! `expiry` as epoch milliseconds). Stores write and clear both together.

use crate::cookie::{CookieDirective, EXPIRY_COOKIE, SessionCookies, TOKEN_COOKIE};
use crate::error::{CoreError, CoreResult};
use crate::session::{self, Session};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

pub const LOCAL_TOKEN_KEY: &str = "token";
pub const LOCAL_EXPIRES_AT_KEY: &str = "expires_at";

/// Storage for the current session
pub trait SessionStore: Send + Sync {
    /// Read the persisted fields and cookies
    fn snapshot(&self) -> CoreResult<SessionRecord>;

    /// Replace the persisted fields and cookies
    fn replace(&self, record: SessionRecord) -> CoreResult<()>;

    /// Persist a session to both locations
    fn save(&self, session: &Session) -> CoreResult<()> {
        self.replace(SessionRecord::from_session(session))
    }

    /// Remove the session from both locations
    fn clear(&self) -> CoreResult<()> {
        let mut record = self.snapshot()?;
        record.clear(Utc::now());
        self.replace(record)
    }

    /// The local `expires_at` field, if present
    fn expires_at(&self) -> CoreResult<Option<DateTime<Utc>>> {
        self.snapshot()?.expires_at()
    }

    /// The session held in local storage, if complete
    fn load(&self) -> CoreResult<Option<Session>> {
        let record = self.snapshot()?;
        let (Some(token), Some(expires_at)) = (record.local_token(), record.expires_at()?) else {
            return Ok(None);
        };
        Ok(Some(Session::new(token, expires_at)))
    }
}

/// Raw contents of both session locations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub local: BTreeMap<String, String>,
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
}

impl SessionRecord {
    pub fn from_session(session: &Session) -> Self {
        let mut record = Self::default();
        record
            .local
            .insert(LOCAL_TOKEN_KEY.to_string(), session.token.clone());
        record
            .local
            .insert(LOCAL_EXPIRES_AT_KEY.to_string(), session.expiry_iso());

        let now = Utc::now();
        for header in SessionCookies::for_session(session).set_cookie_headers() {
            record.apply_set_cookie(&header, now);
        }
        record
    }

    pub fn local_token(&self) -> Option<String> {
        self.local.get(LOCAL_TOKEN_KEY).cloned()
    }

    pub fn expires_at(&self) -> CoreResult<Option<DateTime<Utc>>> {
        self.local
            .get(LOCAL_EXPIRES_AT_KEY)
            .map(|value| session::parse_iso(value))
            .transpose()
    }

    pub fn cookies(&self) -> SessionCookies {
        SessionCookies {
            token: self.cookies.get(TOKEN_COOKIE).cloned(),
            expiry: self.cookies.get(EXPIRY_COOKIE).cloned(),
        }
    }

    /// Render the stored cookies as a `Cookie` request header
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Apply a `Set-Cookie` value the way a browser cookie jar would
    pub fn apply_set_cookie(&mut self, set_cookie: &str, now: DateTime<Utc>) {
        match CookieDirective::parse(set_cookie, now) {
            Some(CookieDirective::Set { name, value }) => {
                self.cookies.insert(name, value);
            }
            Some(CookieDirective::Delete { name }) => {
                self.cookies.remove(&name);
            }
            None => debug!("Ignoring malformed Set-Cookie value"),
        }
    }

    /// Drop the local fields and expire both cookies
    pub fn clear(&mut self, now: DateTime<Utc>) {
        self.local.remove(LOCAL_TOKEN_KEY);
        self.local.remove(LOCAL_EXPIRES_AT_KEY);
        for header in SessionCookies::delete_cookie_headers() {
            self.apply_set_cookie(&header, now);
        }
    }
}

/// In-process session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: RwLock<SessionRecord>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: &Session) -> Self {
        Self {
            record: RwLock::new(SessionRecord::from_session(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn snapshot(&self) -> CoreResult<SessionRecord> {
        self.record
            .read()
            .map(|record| record.clone())
            .map_err(|_| CoreError::store("session lock poisoned"))
    }

    fn replace(&self, record: SessionRecord) -> CoreResult<()> {
        let mut guard = self
            .record
            .write()
            .map_err(|_| CoreError::store("session lock poisoned"))?;
        *guard = record;
        Ok(())
    }
}

/// Session store persisted as a JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn snapshot(&self) -> CoreResult<SessionRecord> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionRecord::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn replace(&self, record: SessionRecord) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&record)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}
