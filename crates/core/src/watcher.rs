//! Expiration watcher
//!
//! Polls the session store on a fixed interval (and once immediately on
//! start). When the session is inside the warning window it clears both
//! storage locations, raises an expiry notice and asks for navigation to the
//! login entry point. Sessions that have already expired are left alone; the
//! route guard rejects them on the next protected navigation.

use crate::clock::{Clock, SystemClock};
use crate::error::CoreResult;
use crate::session::{EXPIRY_WARNING_WINDOW_MS, remaining_ms};
use crate::store::SessionStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const EXPIRY_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Outcome of a single expiry check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No `expires_at` recorded
    NoSession,
    /// Outside the warning window
    Active { remaining_ms: i64 },
    /// Inside the warning window; the session gets invalidated
    Expiring { remaining_ms: i64 },
    /// Already past expiry; left for the route guard
    Expired { overdue_ms: i64 },
}

/// Classify a session expiry against the current time
pub fn assess(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Verdict {
    let Some(expires_at) = expires_at else {
        return Verdict::NoSession;
    };

    let remaining_ms = remaining_ms(expires_at, now);
    if remaining_ms <= 0 {
        Verdict::Expired {
            overdue_ms: -remaining_ms,
        }
    } else if remaining_ms < EXPIRY_WARNING_WINDOW_MS {
        Verdict::Expiring { remaining_ms }
    } else {
        Verdict::Active { remaining_ms }
    }
}

/// User-visible notice raised when the watcher signs a session out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryNotice {
    pub message: String,
    /// Where the user must be sent, as a full navigation
    pub redirect_to: String,
}

/// Receives expiry notices from the watcher
#[cfg_attr(test, mockall::automock)]
pub trait ExpiryNotifier: Send + Sync {
    fn session_expiring(&self, notice: &ExpiryNotice);
}

/// Notifier that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl ExpiryNotifier for LoggingNotifier {
    fn session_expiring(&self, notice: &ExpiryNotice) {
        warn!(redirect_to = %notice.redirect_to, "{}", notice.message);
    }
}

/// Notifier that forwards notices over a channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<ExpiryNotice>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ExpiryNotice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ExpiryNotifier for ChannelNotifier {
    fn session_expiring(&self, notice: &ExpiryNotice) {
        if self.tx.send(notice.clone()).is_err() {
            debug!("Expiry notice dropped, receiver closed");
        }
    }
}

/// Periodic session expiry check
pub struct ExpirationWatcher {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn ExpiryNotifier>,
    interval: Duration,
    login_path: String,
}

impl ExpirationWatcher {
    pub fn new(store: Arc<dyn SessionStore>, notifier: Arc<dyn ExpiryNotifier>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            notifier,
            interval: DEFAULT_POLL_INTERVAL,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    /// Run one check
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or cleared
    pub fn tick(&self) -> CoreResult<Verdict> {
        let verdict = assess(self.store.expires_at()?, self.clock.now());

        match verdict {
            Verdict::Expiring { remaining_ms } => {
                info!(remaining_ms, "Session about to expire, signing out");
                self.store.clear()?;
                self.notifier.session_expiring(&ExpiryNotice {
                    message: EXPIRY_MESSAGE.to_string(),
                    redirect_to: self.login_path.clone(),
                });
            }
            Verdict::Expired { overdue_ms } => {
                debug!(overdue_ms, "Session already expired, leaving it to the route guard");
            }
            Verdict::NoSession | Verdict::Active { .. } => {}
        }

        Ok(verdict)
    }

    /// Poll until `shutdown` turns true or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.tick() {
                        warn!("Session expiry check failed: {}", e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Expiration watcher stopped");
                        break;
                    }
                }
            }
        }
    }

    /// Run on a background task
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
