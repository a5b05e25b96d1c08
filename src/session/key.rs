//! # Session identity.
//!
//! Every submission is identified by a [`SessionKey`]: the pair of the
//! submitting client's id and the client-chosen session id. The pair is
//! globally unique across the controller; a client may reuse a session id
//! only after the previous session with that id is gone.

use std::fmt;

/// Identifier of a connected client, assigned by the service glue.
pub type ClientId = u64;

/// Client-scoped session identifier. Negative values are reserved: a negative
/// session id passed to [`cancel`](crate::SessionController::cancel) selects
/// every session of that client (wildcard).
pub type SessionId = i32;

/// User/app identity used by the OS to express foreground/background
/// priority. The controller partitions its queues by this value.
pub type Uid = i32;

/// Pseudo-UID for offline (background) sessions. Always scheduled behind
/// every monitored foreground UID; never removed from the UID ordering.
pub const OFFLINE_UID: Uid = -1;

/// Primary identifier of one transcoding session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionKey {
    /// Id of the owning client.
    pub client_id: ClientId,
    /// Client-scoped session id.
    pub session_id: SessionId,
}

impl SessionKey {
    /// Creates a key from its parts.
    pub fn new(client_id: ClientId, session_id: SessionId) -> Self {
        Self {
            client_id,
            session_id,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{client:{}, session:{}}}", self.client_id, self.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_diagnostic_format() {
        let key = SessionKey::new(1000, 7);
        assert_eq!(key.to_string(), "{client:1000, session:7}");
    }

    #[test]
    fn keys_order_by_client_then_session() {
        let a = SessionKey::new(1, 5);
        let b = SessionKey::new(2, 0);
        assert!(a < b);
        assert!(SessionKey::new(1, 0) < a);
    }
}
