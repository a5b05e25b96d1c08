//! # transvisor
//!
//! **Transvisor** is a priority-aware transcoding session controller.
//!
//! Many clients submit transcoding sessions; one scarce transcoder executes
//! them. The controller partitions waiting sessions into per-UID FIFO queues,
//! orders UIDs by foreground recency (fed by the OS activity monitor), and
//! drives the transcoder through a start/pause/resume/stop protocol so that
//! exactly the session a foreground user is waiting on runs at any instant.
//! Background ("offline") work runs when nothing realtime is queued.
//!
//! ## Features
//!
//! | Area            | Description                                                          | Key types / traits                          |
//! |-----------------|----------------------------------------------------------------------|---------------------------------------------|
//! | **Scheduling**  | Submit/cancel sessions, foreground-first ordering, single runner.    | [`SessionController`], [`ControllerConfig`] |
//! | **Engine**      | Outbound command protocol and an async adapter for real backends.    | [`Transcoder`], [`TranscoderRelay`], [`AsyncTranscoder`] |
//! | **Policies**    | Foreground-UID and codec-resource collaborators.                     | [`UidPolicy`], [`ResourcePolicy`]           |
//! | **Clients**     | Weakly-held per-session notification sinks.                          | [`ClientCallback`]                          |
//! | **Errors**      | Typed API errors and transcoder failure codes.                       | [`ControllerError`], [`TranscodingErrorCode`] |
//!
//! ## Optional features
//! - `events`: exports [`Event`], [`EventKind`], [`Bus`], [`Subscribe`] and
//!   [`SubscriberSet`] for observability integrations.
//! - `logging`: exports a simple built-in [`LogWriter`] subscriber
//!   _(demo/reference only)_.
//!
//! ```
//! use std::collections::HashSet;
//! use std::sync::{Arc, Weak};
//!
//! use transvisor::{
//!     ClientCallback, ControllerConfig, ControllerError, ResourcePolicy, SessionController,
//!     SessionId, SessionKey, Transcoder, TranscodingErrorCode, TranscodingPriority,
//!     TranscodingRequest, Uid, UidPolicy,
//! };
//!
//! // A no-op engine and policies; real integrations drive hardware and the
//! // OS activity monitor. See `TranscoderRelay` for async backends.
//! struct NullTranscoder;
//!
//! impl Transcoder for NullTranscoder {
//!     fn start(&self, _: SessionKey, _: &TranscodingRequest, _: Weak<dyn ClientCallback>) {}
//!     fn pause(&self, _: SessionKey) {}
//!     fn resume(&self, _: SessionKey, _: &TranscodingRequest) {}
//!     fn stop(&self, _: SessionKey) {}
//! }
//!
//! struct NullPolicy;
//!
//! impl UidPolicy for NullPolicy {
//!     fn register_monitor(&self, _: Uid) {}
//!     fn unregister_monitor(&self, _: Uid) {}
//!     fn is_uid_on_top(&self, _: Uid) -> bool { false }
//!     fn top_uids(&self) -> HashSet<Uid> { HashSet::new() }
//! }
//!
//! impl ResourcePolicy for NullPolicy {
//!     fn register_monitor(&self, _: i32) {}
//!     fn unregister_monitor(&self, _: i32) {}
//! }
//!
//! struct QuietClient;
//!
//! impl ClientCallback for QuietClient {
//!     fn on_transcoding_started(&self, _: SessionId) {}
//!     fn on_transcoding_paused(&self, _: SessionId) {}
//!     fn on_transcoding_resumed(&self, _: SessionId) {}
//!     fn on_transcoding_finished(&self, _: SessionId) {}
//!     fn on_transcoding_failed(&self, _: SessionId, _: TranscodingErrorCode) {}
//!     fn on_progress_update(&self, _: SessionId, _: i32) {}
//!     fn on_resume_pending(&self, _: SessionId) {}
//! }
//!
//! fn main() -> Result<(), ControllerError> {
//!     let controller = SessionController::new(
//!         ControllerConfig::default(),
//!         Arc::new(NullTranscoder),
//!         Arc::new(NullPolicy),
//!         Arc::new(NullPolicy),
//!     );
//!
//!     let client: Arc<dyn ClientCallback> = Arc::new(QuietClient);
//!     let request = TranscodingRequest {
//!         source_path: "file:///clips/holiday.mp4".into(),
//!         destination_path: "file:///clips/holiday.av1.mp4".into(),
//!         priority: TranscodingPriority::High,
//!         client_pid: 4321,
//!     };
//!
//!     // Starts immediately: nothing else is queued.
//!     let handle: Weak<dyn ClientCallback> = Arc::downgrade(&client);
//!     controller.submit(7, 0, 10014, request, handle)?;
//!     controller.cancel(7, 0)?;
//!     Ok(())
//! }
//! ```
//!
//! ---

mod client;
mod config;
mod controller;
mod error;
mod events;
mod policy;
mod queue;
mod relay;
mod session;
mod transcoder;

// Subscriber plumbing only makes sense together with the event types.
#[cfg(feature = "events")]
mod subscribers;

// ---- Public re-exports ----

pub use client::ClientCallback;
pub use config::ControllerConfig;
pub use controller::SessionController;
pub use error::{ControllerError, TranscodingErrorCode};
pub use policy::{ResourcePolicy, UidPolicy};
pub use relay::{AsyncTranscoder, TranscoderCommand, TranscoderRelay};
pub use session::{
    ClientId, SessionId, SessionKey, SessionState, TranscodingPriority, TranscodingRequest, Uid,
    OFFLINE_UID,
};
pub use transcoder::Transcoder;

// Optional: expose event types and subscriber plumbing.
// Enable with: `--features events`
#[cfg(feature = "events")]
pub use events::{Bus, Event, EventKind};
#[cfg(feature = "events")]
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in log subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
