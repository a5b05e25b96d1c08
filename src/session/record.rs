//! # Session records and lifecycle states.
//!
//! A [`Session`] is created by
//! [`submit`](crate::SessionController::submit) and destroyed on cancel,
//! finish or error. While alive it oscillates between [`SessionState::Running`]
//! and [`SessionState::Paused`] as the controller preempts and resumes it; the
//! terminal states are written to the record just before it is dropped so the
//! final observability event carries them.

use std::sync::Weak;

use crate::client::ClientCallback;
use crate::session::{SessionKey, Uid};

/// Lifecycle state of a session, driven by transcoder acknowledgments.
///
/// The controller issues `start`/`pause`/`resume` optimistically and moves a
/// session between the live states only when the matching ack
/// (`on_started`/`on_paused`/`on_resumed`) arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Submitted; the transcoder has not acknowledged a start yet.
    NotStarted,
    /// The transcoder acknowledged a start or resume.
    Running,
    /// The transcoder acknowledged a pause; still queued and schedulable.
    Paused,
    /// Terminal: the transcoder reported completion.
    Finished,
    /// Terminal: the owning client cancelled the session.
    Cancelled,
    /// Terminal: the transcoder reported an error.
    Failed,
}

impl SessionState {
    /// True for states in which the record is about to leave the registry.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Finished | SessionState::Cancelled | SessionState::Failed
        )
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SessionState::NotStarted => "not_started",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::Finished => "finished",
            SessionState::Cancelled => "cancelled",
            SessionState::Failed => "failed",
        }
    }
}

/// Scheduling class of a request.
///
/// Realtime classes queue under the submitting UID; [`Unspecified`] requests
/// fall to the offline queue regardless of the supplied UID.
///
/// [`Unspecified`]: TranscodingPriority::Unspecified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TranscodingPriority {
    /// No client-facing deadline; runs when no foreground work is queued.
    #[default]
    Unspecified,
    /// Normal realtime priority.
    Normal,
    /// High realtime priority.
    High,
}

/// Transcoding job description, passed through to the transcoder verbatim.
///
/// The controller itself reads only [`priority`](Self::priority) (offline
/// routing at submit time) and [`client_pid`](Self::client_pid)
/// (resource-monitor registration); everything else is the backend's
/// business.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscodingRequest {
    /// URI of the source media.
    pub source_path: String,
    /// URI the transcoded output is written to.
    pub destination_path: String,
    /// Scheduling class.
    pub priority: TranscodingPriority,
    /// Pid of the submitting client process, used for codec-resource
    /// monitoring.
    pub client_pid: i32,
}

/// One live transcoding session.
#[derive(Debug)]
pub struct Session {
    /// Primary identifier.
    pub key: SessionKey,
    /// Effective owner; [`OFFLINE_UID`](crate::session::OFFLINE_UID) for
    /// background sessions.
    pub uid: Uid,
    /// Current lifecycle state.
    pub state: SessionState,
    /// Last progress value delivered by the transcoder, in `[0, 100]`.
    pub last_progress: i32,
    /// The job description, forwarded to the transcoder verbatim.
    pub request: TranscodingRequest,
    /// Non-owning handle to the client's notification sink. May expire at any
    /// moment; notifications to an expired handle are dropped silently.
    pub callback: Weak<dyn ClientCallback>,
}

impl Session {
    /// Creates a fresh record in [`SessionState::NotStarted`].
    pub fn new(
        key: SessionKey,
        uid: Uid,
        request: TranscodingRequest,
        callback: Weak<dyn ClientCallback>,
    ) -> Self {
        Self {
            key,
            uid,
            state: SessionState::NotStarted,
            last_progress: 0,
            request,
            callback,
        }
    }
}
