use std::collections::HashSet;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::client::ClientCallback;
use crate::config::ControllerConfig;
use crate::error::{ControllerError, TranscodingErrorCode};
use crate::events::{Bus, Event, EventKind};
use crate::policy::{ResourcePolicy, UidPolicy};
use crate::queue::UidQueues;
use crate::session::{
    ClientId, Session, SessionId, SessionKey, SessionRegistry, SessionState, TranscodingPriority,
    TranscodingRequest, Uid, OFFLINE_UID,
};
use crate::transcoder::Transcoder;

/// Mutable scheduler state, guarded by the controller-wide lock.
pub(super) struct ControllerState {
    /// All live sessions.
    pub(super) registry: SessionRegistry,
    /// Per-UID FIFO queues and the top-UID ordering.
    pub(super) queues: UidQueues,
    /// The session the transcoder is executing, from the controller's point
    /// of view. Reflects issued commands, not acknowledged state.
    pub(super) current: Option<SessionKey>,
    /// Session with an unacknowledged `resume` outstanding. Suppresses
    /// duplicate resumes while the ack is in flight.
    pub(super) resume_pending: Option<SessionKey>,
    /// Codec resources are reclaimed; the driver idles until they return.
    pub(super) resource_lost: bool,
}

/// Priority-aware transcoding session controller.
///
/// Accepts sessions from many clients, keeps one FIFO queue per owning UID,
/// orders UIDs by foreground recency, and drives the [`Transcoder`] through
/// start/pause/resume/stop so that at most one session executes at any
/// instant — the one a foreground user is most likely waiting on.
///
/// All entry points (client API, transcoder acks, policy pushes, dump) take
/// one controller-wide mutex for the entirety of the call, and collaborators
/// are invoked while it is held; see the trait docs for the non-blocking
/// contract this imposes.
pub struct SessionController {
    config: ControllerConfig,
    bus: Bus,
    transcoder: Arc<dyn Transcoder>,
    uid_policy: Arc<dyn UidPolicy>,
    resource_policy: Arc<dyn ResourcePolicy>,
    pub(super) state: Mutex<ControllerState>,
}

impl SessionController {
    /// Creates a controller wired to its three collaborators.
    ///
    /// The offline queue exists from the start; realtime UID queues appear
    /// as submissions come in.
    pub fn new(
        config: ControllerConfig,
        transcoder: Arc<dyn Transcoder>,
        uid_policy: Arc<dyn UidPolicy>,
        resource_policy: Arc<dyn ResourcePolicy>,
    ) -> Arc<Self> {
        let bus = Bus::new(config.bus_capacity);
        Arc::new(Self {
            config,
            bus,
            transcoder,
            uid_policy,
            resource_policy,
            state: Mutex::new(ControllerState {
                registry: SessionRegistry::new(),
                queues: UidQueues::new(),
                current: None,
                resume_pending: None,
                resource_lost: false,
            }),
        })
    }

    /// Subscribes to the controller's observability event stream.
    #[cfg(feature = "events")]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    // === Client API ===

    /// Accepts a new session and schedules it.
    ///
    /// The session queues under `uid`, or under the offline pseudo-UID when
    /// the request carries no realtime priority. A UID seen for the first
    /// time is registered with the activity monitor. Fails with
    /// [`ControllerError::AlreadyExists`] when the key is already live.
    pub fn submit(
        &self,
        client_id: ClientId,
        session_id: SessionId,
        uid: Uid,
        request: TranscodingRequest,
        callback: Weak<dyn ClientCallback>,
    ) -> Result<(), ControllerError> {
        let key = SessionKey::new(client_id, session_id);
        let mut state = self.state.lock();

        if state.registry.contains(key) {
            self.bus.publish(
                Event::now(EventKind::SessionRejected)
                    .with_session(key)
                    .with_reason("duplicate key"),
            );
            return Err(ControllerError::AlreadyExists { key });
        }

        // Requests without a realtime deadline always queue offline.
        let mut uid = uid;
        if request.priority == TranscodingPriority::Unspecified {
            uid = OFFLINE_UID;
        }

        let mut uid_is_top = uid != OFFLINE_UID && self.uid_policy.is_uid_on_top(uid);
        if uid != OFFLINE_UID && !state.queues.contains_uid(uid) {
            if self.config.demote_unmonitored && !uid_is_top {
                uid = OFFLINE_UID;
                uid_is_top = false;
            } else {
                self.uid_policy.register_monitor(uid);
            }
        }

        let pid = request.client_pid;
        state
            .registry
            .insert(Session::new(key, uid, request, callback))?;
        state.queues.enqueue(uid, key, uid_is_top);
        self.resource_policy.register_monitor(pid);

        self.bus.publish(
            Event::now(EventKind::SessionSubmitted)
                .with_session(key)
                .with_uid(uid),
        );
        self.drive(&mut state);
        self.validate(&state);
        Ok(())
    }

    /// Cancels a session without notifying its client.
    ///
    /// The transcoder gets a `stop` for any session it has already seen; a
    /// queued, never-started session is removed silently. A negative
    /// `session_id` is a wildcard selecting every realtime session of
    /// `client_id` (offline work survives client death) and always succeeds.
    pub fn cancel(
        &self,
        client_id: ClientId,
        session_id: SessionId,
    ) -> Result<(), ControllerError> {
        let mut state = self.state.lock();

        let keys = if session_id < 0 {
            state
                .registry
                .keys_of_client(client_id)
                .into_iter()
                .filter(|&key| {
                    state
                        .registry
                        .get(key)
                        .map(|session| session.uid != OFFLINE_UID)
                        .unwrap_or(false)
                })
                .collect()
        } else {
            let key = SessionKey::new(client_id, session_id);
            if !state.registry.contains(key) {
                return Err(ControllerError::NotFound { key });
            }
            vec![key]
        };

        for key in keys {
            let is_current = state.current == Some(key);
            if let Ok(session) = state.registry.get_mut(key) {
                if is_current || session.state != SessionState::NotStarted {
                    self.transcoder.stop(key);
                }
                session.state = SessionState::Cancelled;
            }
            self.remove_session(&mut state, key);
            self.bus
                .publish(Event::now(EventKind::SessionCancelled).with_session(key));
        }

        self.drive(&mut state);
        self.validate(&state);
        Ok(())
    }

    /// Read-only snapshot of a live session's request.
    pub fn get_session(
        &self,
        client_id: ClientId,
        session_id: SessionId,
    ) -> Option<TranscodingRequest> {
        let state = self.state.lock();
        state
            .registry
            .get(SessionKey::new(client_id, session_id))
            .ok()
            .map(|session| session.request.clone())
    }

    /// Current lifecycle state of a live session. Diagnostic only.
    pub fn session_state(
        &self,
        client_id: ClientId,
        session_id: SessionId,
    ) -> Option<SessionState> {
        let state = self.state.lock();
        state
            .registry
            .get(SessionKey::new(client_id, session_id))
            .ok()
            .map(|session| session.state)
    }

    // === Transcoder acknowledgments ===

    /// The transcoder acknowledged a start.
    pub fn on_started(&self, client_id: ClientId, session_id: SessionId) {
        let key = SessionKey::new(client_id, session_id);
        let mut state = self.state.lock();

        let Ok(session) = state.registry.get_mut(key) else {
            self.drop_spurious(key, "start ack for unknown session");
            return;
        };
        if !matches!(
            session.state,
            SessionState::NotStarted | SessionState::Paused
        ) {
            self.drop_spurious(key, "start ack in inconsistent state");
            return;
        }
        session.state = SessionState::Running;
        Self::notify(session, |cb| cb.on_transcoding_started(session_id));
        if state.resume_pending == Some(key) {
            state.resume_pending = None;
        }
        self.bus
            .publish(Event::now(EventKind::SessionStarted).with_session(key));
        self.validate(&state);
    }

    /// The transcoder acknowledged a pause. Re-drives: the displaced slot is
    /// free now, and the head of the queues may be waiting on it.
    pub fn on_paused(&self, client_id: ClientId, session_id: SessionId) {
        let key = SessionKey::new(client_id, session_id);
        let mut state = self.state.lock();

        let Ok(session) = state.registry.get_mut(key) else {
            self.drop_spurious(key, "pause ack for unknown session");
            return;
        };
        if session.state != SessionState::Running {
            self.drop_spurious(key, "pause ack in inconsistent state");
            return;
        }
        session.state = SessionState::Paused;
        Self::notify(session, |cb| cb.on_transcoding_paused(session_id));
        self.bus
            .publish(Event::now(EventKind::SessionPaused).with_session(key));
        self.drive(&mut state);
        self.validate(&state);
    }

    /// The transcoder acknowledged a resume.
    pub fn on_resumed(&self, client_id: ClientId, session_id: SessionId) {
        let key = SessionKey::new(client_id, session_id);
        let mut state = self.state.lock();

        let Ok(session) = state.registry.get_mut(key) else {
            self.drop_spurious(key, "resume ack for unknown session");
            return;
        };
        if session.state != SessionState::Paused {
            self.drop_spurious(key, "resume ack in inconsistent state");
            return;
        }
        session.state = SessionState::Running;
        Self::notify(session, |cb| cb.on_transcoding_resumed(session_id));
        if state.resume_pending == Some(key) {
            state.resume_pending = None;
        }
        self.bus
            .publish(Event::now(EventKind::SessionResumed).with_session(key));
        self.validate(&state);
    }

    /// The transcoder reported completion. The session is destroyed, its
    /// client is told, and the next session is scheduled.
    pub fn on_finish(&self, client_id: ClientId, session_id: SessionId) {
        let key = SessionKey::new(client_id, session_id);
        let mut state = self.state.lock();

        let Ok(session) = state.registry.get_mut(key) else {
            self.drop_spurious(key, "finish for unknown session");
            return;
        };
        // A finish can arrive late, after this session was displaced; it is
        // still real and still propagates. Only work the transcoder never
        // acknowledged is ignored.
        if session.state == SessionState::NotStarted {
            self.drop_spurious(key, "finish for session that was never started");
            return;
        }
        session.state = SessionState::Finished;
        Self::notify(session, |cb| cb.on_transcoding_finished(session_id));
        self.remove_session(&mut state, key);
        self.bus
            .publish(Event::now(EventKind::SessionFinished).with_session(key));
        self.drive(&mut state);
        self.validate(&state);
    }

    /// The transcoder reported a failure. Same removal as a finish; the
    /// client receives the error code exactly once, here.
    pub fn on_error(&self, client_id: ClientId, session_id: SessionId, err: TranscodingErrorCode) {
        let key = SessionKey::new(client_id, session_id);
        let mut state = self.state.lock();

        let Ok(session) = state.registry.get_mut(key) else {
            self.drop_spurious(key, "error for unknown session");
            return;
        };
        if session.state == SessionState::NotStarted {
            self.drop_spurious(key, "error for session that was never started");
            return;
        }
        session.state = SessionState::Failed;
        Self::notify(session, |cb| cb.on_transcoding_failed(session_id, err));
        self.remove_session(&mut state, key);
        self.bus.publish(
            Event::now(EventKind::SessionFailed)
                .with_session(key)
                .with_error(err.to_string()),
        );
        self.drive(&mut state);
        self.validate(&state);
    }

    /// The transcoder reported progress.
    ///
    /// Values that leave `[0, 100]` are spurious. A value below the last
    /// delivered one is accepted and dropped, keeping client-visible
    /// progress monotonic.
    pub fn on_progress_update(&self, client_id: ClientId, session_id: SessionId, progress: i32) {
        let key = SessionKey::new(client_id, session_id);
        let mut state = self.state.lock();

        let Ok(session) = state.registry.get_mut(key) else {
            self.drop_spurious(key, "progress for unknown session");
            return;
        };
        if session.state == SessionState::NotStarted {
            self.drop_spurious(key, "progress for session that was never started");
            return;
        }
        if !(0..=100).contains(&progress) {
            self.drop_spurious(key, "progress out of range");
            return;
        }
        if progress < session.last_progress {
            return;
        }
        session.last_progress = progress;
        Self::notify(session, |cb| cb.on_progress_update(session_id, progress));
        self.bus.publish(
            Event::now(EventKind::ProgressUpdated)
                .with_session(key)
                .with_progress(progress),
        );
        self.validate(&state);
    }

    /// The codec hardware was reclaimed.
    ///
    /// The backend is already ceding the resource, so the current session is
    /// marked paused as the pause command goes out — no ack will follow. The
    /// driver idles until [`on_resource_available`](Self::on_resource_available).
    pub fn on_resource_lost(&self) {
        let mut state = self.state.lock();

        if let Some(current) = state.current {
            if let Ok(session) = state.registry.get_mut(current) {
                if session.state == SessionState::Running {
                    self.transcoder.pause(current);
                    session.state = SessionState::Paused;
                }
                Self::notify(session, |cb| cb.on_resume_pending(current.session_id));
            }
        }
        state.resource_lost = true;
        self.bus.publish(Event::now(EventKind::ResourceLost));
        self.validate(&state);
    }

    // === Policy pushes ===

    /// The activity monitor pushed a new foreground UID set.
    ///
    /// Monitored UIDs in the set move to the front of the ordering; the UID
    /// of a currently executing session keeps the head if it is itself in
    /// the set, so a top-set flicker that still contains it causes no churn.
    pub fn on_top_uids_changed(&self, uids: &HashSet<Uid>) {
        if uids.is_empty() {
            return;
        }
        let mut state = self.state.lock();

        let preserve_front = state.current.is_some();
        state.queues.promote_uids(uids, preserve_front);
        self.bus
            .publish(Event::now(EventKind::TopUidsChanged).with_reason(format!("{uids:?}")));
        self.drive(&mut state);
        self.validate(&state);
    }

    /// The codec hardware came back; resume whatever is on top now.
    pub fn on_resource_available(&self) {
        let mut state = self.state.lock();

        state.resource_lost = false;
        self.bus.publish(Event::now(EventKind::ResourceAvailable));
        self.drive(&mut state);
        self.validate(&state);
    }

    // === Internals ===

    /// Converges the transcoder onto the session that should be running.
    ///
    /// Invoked after every mutation of the registry, the queues or the
    /// resource flag. Compares `current` (what the transcoder was last told
    /// to execute) against the selector's pick and issues the minimal
    /// pause/start/resume sequence, pause of the displaced session first.
    /// States move only on acks, so `current` tracks intent.
    fn drive(&self, state: &mut ControllerState) {
        if state.resource_lost {
            return;
        }
        let target = state.queues.select_next();

        if state.current == target {
            let Some(key) = target else { return };
            if state.resume_pending == Some(key) {
                return;
            }
            if let Ok(session) = state.registry.get(key) {
                if session.state == SessionState::Paused {
                    self.transcoder.resume(key, &session.request);
                    state.resume_pending = Some(key);
                }
            }
            return;
        }

        // Pause the displaced session before its replacement touches the
        // engine. Anything the engine may still be executing needs the
        // pause: an acked runner, an unacked start (NotStarted is only
        // current when a start went out) or an unacked resume.
        if let Some(current) = state.current {
            let engine_active = state.resume_pending == Some(current)
                || state
                    .registry
                    .get(current)
                    .map(|session| {
                        matches!(
                            session.state,
                            SessionState::Running | SessionState::NotStarted
                        )
                    })
                    .unwrap_or(false);
            if engine_active {
                self.transcoder.pause(current);
            }
        }
        state.resume_pending = None;
        if let Some(key) = target {
            if let Ok(session) = state.registry.get(key) {
                match session.state {
                    SessionState::NotStarted => {
                        self.transcoder
                            .start(key, &session.request, session.callback.clone());
                    }
                    SessionState::Paused => {
                        self.transcoder.resume(key, &session.request);
                        state.resume_pending = Some(key);
                    }
                    // Pause ack still outstanding; the on_paused re-drive
                    // picks this session up again.
                    _ => {}
                }
            }
        }
        state.current = target;
    }

    /// Detaches a session from the queues and registry.
    ///
    /// When its UID queue empties out, the UID leaves the ordering, its
    /// monitor registration is withdrawn and the remaining ordering is
    /// re-sorted against the monitor's current top set. The caller decides
    /// whether a transcoder `stop` or a client notification accompanies the
    /// removal.
    fn remove_session(&self, state: &mut ControllerState, key: SessionKey) {
        let Ok(session) = state.registry.remove(key) else {
            return;
        };
        if state.queues.remove(session.uid, key) {
            self.uid_policy.unregister_monitor(session.uid);
            let top_uids = self.uid_policy.top_uids();
            state.queues.promote_uids(&top_uids, false);
        }
        self.resource_policy
            .unregister_monitor(session.request.client_pid);
        if state.current == Some(key) {
            state.current = None;
        }
        if state.resume_pending == Some(key) {
            state.resume_pending = None;
        }
    }

    /// Fans a lifecycle change out to the session's client, dropping it
    /// silently when the owner is gone.
    fn notify(session: &Session, f: impl FnOnce(&dyn ClientCallback)) {
        if let Some(cb) = session.callback.upgrade() {
            f(cb.as_ref());
        }
    }

    /// Records a callback that referenced an unknown session or arrived in a
    /// state the lifecycle table does not allow. Logged and dropped; never a
    /// panic.
    fn drop_spurious(&self, key: SessionKey, reason: &str) {
        self.bus.publish(
            Event::now(EventKind::SpuriousCallback)
                .with_session(key)
                .with_reason(reason),
        );
    }

    /// Structural self-check after every mutation (debug builds only):
    /// ordering and queue set agree, every queued key resolves, and every
    /// registered session sits in exactly one queue position.
    fn validate(&self, state: &ControllerState) {
        if !cfg!(debug_assertions) {
            return;
        }
        debug_assert!(
            state.queues.contains_uid(OFFLINE_UID),
            "offline queue missing"
        );
        debug_assert_eq!(
            state.queues.uids().count(),
            state.queues.len(),
            "uid ordering and queue set out of sync"
        );
        debug_assert_eq!(
            state.registry.is_empty(),
            state.queues.is_empty(),
            "registry and queues disagree on emptiness"
        );
        let mut total = 0;
        for uid in state.queues.uids() {
            match state.queues.queue(uid) {
                Some(queue) => {
                    for &key in queue {
                        debug_assert!(
                            state.registry.contains(key),
                            "queued session {key} not in registry"
                        );
                    }
                    total += queue.len();
                }
                None => debug_assert!(false, "uid {uid} in ordering without a queue"),
            }
        }
        debug_assert_eq!(
            total,
            state.registry.len(),
            "registry and queues disagree on session count"
        );
        for session in state.registry.iter() {
            let slots = state
                .queues
                .queue(session.uid)
                .map(|queue| queue.iter().filter(|&&key| key == session.key).count())
                .unwrap_or(0);
            debug_assert_eq!(
                slots, 1,
                "session {} not in exactly one queue position",
                session.key
            );
        }
    }
}
