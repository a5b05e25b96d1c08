//! # Observability events emitted by the controller.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Admission events**: submissions accepted or rejected.
//! - **Lifecycle events**: transcoder acknowledgments and terminal outcomes.
//! - **Scheduling events**: top-UID changes and resource flag transitions.
//! - **Hygiene events**: spurious callbacks that were logged and dropped.
//!
//! The [`Event`] struct carries optional metadata such as the session key,
//! UID, progress value and a free-form reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically, so events can be re-ordered correctly even when delivered
//! through async channels.
//!
//! ## Example
//! ```rust
//! # #[cfg(feature = "events")]
//! # {
//! use transvisor::{Event, EventKind, SessionKey};
//!
//! let ev = Event::now(EventKind::SessionFailed)
//!     .with_session(SessionKey::new(1, 7))
//!     .with_error("invalid bitstream");
//!
//! assert_eq!(ev.kind, EventKind::SessionFailed);
//! assert_eq!(ev.session, Some(SessionKey::new(1, 7)));
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::session::{SessionKey, Uid};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of controller events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Admission events ===
    /// A submission was accepted and enqueued.
    SessionSubmitted,
    /// A submission was rejected (duplicate key).
    SessionRejected,

    // === Lifecycle events ===
    /// The transcoder acknowledged a start.
    SessionStarted,
    /// The transcoder acknowledged a pause.
    SessionPaused,
    /// The transcoder acknowledged a resume.
    SessionResumed,
    /// The transcoder reported completion; the session is gone.
    SessionFinished,
    /// The transcoder reported an error; the session is gone.
    SessionFailed,
    /// The owning client cancelled the session; the session is gone.
    SessionCancelled,
    /// The transcoder reported a progress advance.
    ProgressUpdated,

    // === Scheduling events ===
    /// The activity monitor pushed a new foreground UID set.
    TopUidsChanged,
    /// Codec resources were reclaimed; scheduling is suspended.
    ResourceLost,
    /// Codec resources returned; scheduling resumed.
    ResourceAvailable,

    // === Hygiene events ===
    /// A callback referenced an unknown session or an inconsistent state and
    /// was dropped.
    SpuriousCallback,
}

/// Controller event with optional metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    /// Used to determine event ordering across async boundaries.
    pub seq: u64,
    /// Wall-clock timestamp (may go backwards, use for logging only).
    pub at: SystemTime,
    /// The kind of event.
    pub kind: EventKind,
    /// Session the event refers to, if any.
    pub session: Option<SessionKey>,
    /// UID the event refers to, if any.
    pub uid: Option<Uid>,
    /// Progress value, for [`EventKind::ProgressUpdated`].
    pub progress: Option<i32>,
    /// Error message, if the event represents a failure.
    pub error: Option<String>,
    /// Free-form diagnostic reason (e.g. why a callback was spurious).
    pub reason: Option<String>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            session: None,
            uid: None,
            progress: None,
            error: None,
            reason: None,
        }
    }

    /// Attaches a session key.
    pub fn with_session(mut self, key: SessionKey) -> Self {
        self.session = Some(key);
        self
    }

    /// Attaches a UID.
    pub fn with_uid(mut self, uid: Uid) -> Self {
        self.uid = Some(uid);
        self
    }

    /// Attaches a progress value.
    pub fn with_progress(mut self, progress: i32) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Attaches an error message.
    pub fn with_error(mut self, msg: impl Into<String>) -> Self {
        self.error = Some(msg.into());
        self
    }

    /// Attaches a diagnostic reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
