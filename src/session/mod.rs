//! Anonymous sessions that partition transactions between clients.
//!
//! A session is nothing more than an opaque identifier stored in the
//! `sessionId` cookie. It is minted when a client without one records its
//! first transaction, and read endpoints are guarded by [session_guard].

mod cookie;
mod middleware;

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use cookie::{DEFAULT_SESSION_DURATION, SESSION_COOKIE, get_session_id, set_session_cookie};
pub use middleware::session_guard;

/// The identifier of an anonymous client session.
///
/// Route handlers behind [session_guard] receive the caller's session with the
/// argument `Extension(session_id): Extension<SessionId>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap an existing session identifier, e.g. the value of a cookie.
    ///
    /// Returns `None` if `value` is empty after trimming whitespace.
    pub fn new(value: &str) -> Option<Self> {
        let value = value.trim();

        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_owned()))
        }
    }

    /// Mint a new, globally unique session identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The session identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
