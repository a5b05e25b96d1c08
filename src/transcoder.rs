//! # Outbound transcoder interface.
//!
//! [`Transcoder`] is the controller's view of the downstream transcoding
//! engine. The controller is the only component that calls it, and it does so
//! while holding its own lock, so every method is fire-and-forget and must
//! not block.
//!
//! Acknowledgments and results flow back asynchronously through the
//! controller's event sink
//! ([`on_started`](crate::SessionController::on_started),
//! [`on_paused`](crate::SessionController::on_paused),
//! [`on_resumed`](crate::SessionController::on_resumed),
//! [`on_finish`](crate::SessionController::on_finish),
//! [`on_error`](crate::SessionController::on_error),
//! [`on_progress_update`](crate::SessionController::on_progress_update),
//! [`on_resource_lost`](crate::SessionController::on_resource_lost)).
//!
//! ## Rules
//! - Methods must return promptly: hand the command to your own executor
//!   (see [`TranscoderRelay`](crate::TranscoderRelay) for a ready-made
//!   adapter over an async backend).
//! - Methods must not re-enter the controller synchronously; deliver acks
//!   from another task or thread.
//! - Per session, commands arrive in the order the controller issued them.
//!   Across sessions the only guarantee is that the pause of a displaced
//!   session is issued before the start/resume of its replacement.

use std::sync::Weak;

use crate::client::ClientCallback;
use crate::session::{SessionKey, TranscodingRequest};

/// Downstream transcoding engine, driven by the controller.
pub trait Transcoder: Send + Sync {
    /// Begins executing a session the engine has not seen before.
    ///
    /// `callback` is the owning client's notification sink, forwarded so the
    /// engine can attach it to hardware-level events if it wants to; the
    /// controller keeps its own copy for lifecycle fan-out.
    fn start(
        &self,
        key: SessionKey,
        request: &TranscodingRequest,
        callback: Weak<dyn ClientCallback>,
    );

    /// Suspends the session's execution, keeping its progress.
    fn pause(&self, key: SessionKey);

    /// Resumes a previously paused session.
    fn resume(&self, key: SessionKey, request: &TranscodingRequest);

    /// Aborts the session and releases everything it holds. No ack follows;
    /// the controller has already forgotten the session when it calls this.
    fn stop(&self, key: SessionKey);
}
