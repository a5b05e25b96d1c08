//! # Client notification sink.
//!
//! Each session carries a [`Weak`](std::sync::Weak) handle to its owner's
//! [`ClientCallback`]. The controller upgrades the handle at notification
//! time and drops the notification silently when the owner is gone — a
//! client's death never stalls or fails the scheduler.
//!
//! ## Rules
//! - Callbacks are invoked under the controller lock and must return
//!   promptly; defer real work to your own executor.
//! - Callbacks must not re-enter the controller
//!   (`submit`/`cancel`/`get_session`) synchronously — that deadlocks the
//!   single controller-wide lock.
//! - Failure is surfaced exactly once per session, on destruction, via
//!   [`on_transcoding_failed`](ClientCallback::on_transcoding_failed).

use crate::error::TranscodingErrorCode;
use crate::session::SessionId;

/// Per-client notification sink for session lifecycle events.
///
/// Methods take only the session id: the callback itself is client-scoped,
/// so the client id is implied.
pub trait ClientCallback: Send + Sync {
    /// The transcoder acknowledged the first start of the session.
    fn on_transcoding_started(&self, session_id: SessionId);

    /// The session was preempted and the transcoder acknowledged the pause.
    fn on_transcoding_paused(&self, session_id: SessionId);

    /// The session became top again and the transcoder acknowledged the
    /// resume.
    fn on_transcoding_resumed(&self, session_id: SessionId);

    /// The session completed. The record is gone when this fires.
    fn on_transcoding_finished(&self, session_id: SessionId);

    /// The session failed with `err`. The record is gone when this fires.
    fn on_transcoding_failed(&self, session_id: SessionId, err: TranscodingErrorCode);

    /// Progress advanced to `progress` (monotonic, in `[0, 100]`).
    fn on_progress_update(&self, session_id: SessionId, progress: i32);

    /// Codec resources were reclaimed while this session was executing; it
    /// will resume without client action once the resources return.
    fn on_resume_pending(&self, session_id: SessionId);
}
