//! Bankfront core session types and utilities
//!
//! Holds the client-side session model (token plus expiry), the stores that
//! persist it in its two locations (local fields and mirrored cookies), the
//! expiration watcher that invalidates a session shortly before it expires,
//! and the token verification seam used by the HTTP layer.

pub mod clock;
pub mod cookie;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod session;
pub mod store;
pub mod verify;
pub mod watcher;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cookie::SessionCookies;
pub use error::{CoreError, CoreResult};
pub use session::Session;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use verify::{TokenVerifier, UserId};
pub use watcher::{ExpirationWatcher, ExpiryNotifier, Verdict};
