//! # Keyed store of live sessions.
//!
//! [`SessionRegistry`] owns every accepted session record. It is a plain
//! ordered map with typed errors; the scheduling invariants (single runner,
//! queue membership) are enforced by the controller, not here.

use std::collections::BTreeMap;

use crate::error::ControllerError;
use crate::session::{Session, SessionKey};

/// Store of all live sessions, keyed by [`SessionKey`].
#[derive(Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<SessionKey, Session>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new record.
    pub fn insert(&mut self, session: Session) -> Result<(), ControllerError> {
        let key = session.key;
        if self.sessions.contains_key(&key) {
            return Err(ControllerError::AlreadyExists { key });
        }
        self.sessions.insert(key, session);
        Ok(())
    }

    /// True if a live session exists under `key`.
    pub fn contains(&self, key: SessionKey) -> bool {
        self.sessions.contains_key(&key)
    }

    /// Looks up a record.
    pub fn get(&self, key: SessionKey) -> Result<&Session, ControllerError> {
        self.sessions
            .get(&key)
            .ok_or(ControllerError::NotFound { key })
    }

    /// Looks up a record for mutation.
    pub fn get_mut(&mut self, key: SessionKey) -> Result<&mut Session, ControllerError> {
        self.sessions
            .get_mut(&key)
            .ok_or(ControllerError::NotFound { key })
    }

    /// Removes and returns a record.
    pub fn remove(&mut self, key: SessionKey) -> Result<Session, ControllerError> {
        self.sessions
            .remove(&key)
            .ok_or(ControllerError::NotFound { key })
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no session is live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Iterates over live sessions in key order. Diagnostic use only.
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    /// Keys of every live session belonging to `client_id`, in session order.
    pub fn keys_of_client(&self, client_id: u64) -> Vec<SessionKey> {
        self.sessions
            .range(
                SessionKey::new(client_id, i32::MIN)..=SessionKey::new(client_id, i32::MAX),
            )
            .map(|(key, _)| *key)
            .collect()
    }
}
