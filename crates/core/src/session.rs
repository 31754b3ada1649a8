//! The client-side session: a bearer token and the instant it stops being valid

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, DurationRound, SecondsFormat, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Sessions closer than this to expiry are invalidated proactively
pub const EXPIRY_WARNING_WINDOW_MS: i64 = 600_000;

/// Bearer token plus expiry, as held by the browser
///
/// The expiry is kept at millisecond precision, the resolution of both
/// storage formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(deserialize_with = "deserialize_millis")]
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at: truncate_millis(expires_at),
        }
    }

    /// Milliseconds left until expiry; negative once expired
    pub fn remaining_ms(&self, now: DateTime<Utc>) -> i64 {
        remaining_ms(self.expires_at, now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining_ms(now) <= 0
    }

    /// Expiry as epoch milliseconds, the format of the `expiry` cookie
    pub fn expiry_millis(&self) -> i64 {
        self.expires_at.timestamp_millis()
    }

    /// Expiry as an ISO-8601 string, the format of the `expires_at` local field
    pub fn expiry_iso(&self) -> String {
        format_iso(self.expires_at)
    }
}

/// Milliseconds between two instants, both taken on the whole-millisecond grid
pub fn remaining_ms(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    expires_at.timestamp_millis() - now.timestamp_millis()
}

/// Drop anything below a millisecond
pub fn truncate_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    at.duration_trunc(TimeDelta::milliseconds(1)).unwrap_or(at)
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    DateTime::<Utc>::deserialize(deserializer).map(truncate_millis)
}

pub fn format_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 / RFC 3339 timestamp
pub fn parse_iso(value: &str) -> CoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| CoreError::invalid_timestamp(format!("{value}: {e}")))
}

/// Parse an epoch-millisecond string
pub fn parse_millis(value: &str) -> CoreResult<DateTime<Utc>> {
    let millis = value
        .trim()
        .parse::<i64>()
        .map_err(|e| CoreError::invalid_timestamp(format!("{value}: {e}")))?;
    from_millis(millis)
}

pub fn from_millis(millis: i64) -> CoreResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| CoreError::invalid_timestamp(format!("{millis} is out of range")))
}
