//! Tests for the observability surface (requires `--features events`).
#![cfg(feature = "events")]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;

use transvisor::{
    ClientCallback, ControllerConfig, Event, EventKind, ResourcePolicy, SessionController,
    SessionId, SessionKey, Subscribe, SubscriberSet, Transcoder, TranscodingErrorCode,
    TranscodingPriority, TranscodingRequest, Uid, UidPolicy,
};

struct NullTranscoder;

impl Transcoder for NullTranscoder {
    fn start(&self, _: SessionKey, _: &TranscodingRequest, _: Weak<dyn ClientCallback>) {}
    fn pause(&self, _: SessionKey) {}
    fn resume(&self, _: SessionKey, _: &TranscodingRequest) {}
    fn stop(&self, _: SessionKey) {}
}

struct NullPolicy;

impl UidPolicy for NullPolicy {
    fn register_monitor(&self, _: Uid) {}
    fn unregister_monitor(&self, _: Uid) {}
    fn is_uid_on_top(&self, _: Uid) -> bool {
        false
    }
    fn top_uids(&self) -> HashSet<Uid> {
        HashSet::new()
    }
}

impl ResourcePolicy for NullPolicy {
    fn register_monitor(&self, _: i32) {}
    fn unregister_monitor(&self, _: i32) {}
}

struct NoClient;

impl ClientCallback for NoClient {
    fn on_transcoding_started(&self, _: SessionId) {}
    fn on_transcoding_paused(&self, _: SessionId) {}
    fn on_transcoding_resumed(&self, _: SessionId) {}
    fn on_transcoding_finished(&self, _: SessionId) {}
    fn on_transcoding_failed(&self, _: SessionId, _: TranscodingErrorCode) {}
    fn on_progress_update(&self, _: SessionId, _: i32) {}
    fn on_resume_pending(&self, _: SessionId) {}
}

fn request() -> TranscodingRequest {
    TranscodingRequest {
        source_path: "file:///in.mp4".into(),
        destination_path: "file:///out.mp4".into(),
        priority: TranscodingPriority::High,
        client_pid: 1,
    }
}

#[tokio::test]
async fn controller_publishes_lifecycle_events_in_order() {
    let controller = SessionController::new(
        ControllerConfig::default(),
        Arc::new(NullTranscoder),
        Arc::new(NullPolicy),
        Arc::new(NullPolicy),
    );
    let mut rx = controller.subscribe();

    controller
        .submit(1, 1, 100, request(), Weak::<NoClient>::new())
        .unwrap();
    controller.on_started(1, 1);
    controller.on_progress_update(1, 1, 40);
    controller.on_finish(1, 1);
    controller.on_finish(1, 1);

    let kinds: Vec<EventKind> = [
        rx.recv().await.unwrap(),
        rx.recv().await.unwrap(),
        rx.recv().await.unwrap(),
        rx.recv().await.unwrap(),
        rx.recv().await.unwrap(),
    ]
    .iter()
    .map(|ev| ev.kind)
    .collect();

    assert_eq!(
        kinds,
        vec![
            EventKind::SessionSubmitted,
            EventKind::SessionStarted,
            EventKind::ProgressUpdated,
            EventKind::SessionFinished,
            EventKind::SpuriousCallback,
        ]
    );
}

#[tokio::test]
async fn event_sequence_numbers_are_strictly_increasing() {
    let controller = SessionController::new(
        ControllerConfig::default(),
        Arc::new(NullTranscoder),
        Arc::new(NullPolicy),
        Arc::new(NullPolicy),
    );
    let mut rx = controller.subscribe();

    controller
        .submit(1, 1, 100, request(), Weak::<NoClient>::new())
        .unwrap();
    controller.cancel(1, 1).unwrap();

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.kind, EventKind::SessionSubmitted);
    assert_eq!(second.kind, EventKind::SessionCancelled);
    assert!(second.seq > first.seq);
}

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<EventKind>>,
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, event: &Event) {
        self.seen.lock().unwrap().push(event.kind);
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

struct Panicker;

#[async_trait]
impl Subscribe for Panicker {
    async fn on_event(&self, _event: &Event) {
        panic!("subscriber bug");
    }

    fn name(&self) -> &'static str {
        "panicker"
    }
}

#[tokio::test]
async fn subscriber_panics_do_not_stop_the_fanout() {
    let recorder = Arc::new(Recorder::default());
    let set = SubscriberSet::new(vec![
        Arc::clone(&recorder) as Arc<dyn Subscribe>,
        Arc::new(Panicker),
    ]);
    assert_eq!(set.len(), 2);

    set.emit(&Event::now(EventKind::ResourceLost));
    set.emit(&Event::now(EventKind::ResourceAvailable));
    set.shutdown().await;

    assert_eq!(
        *recorder.seen.lock().unwrap(),
        vec![EventKind::ResourceLost, EventKind::ResourceAvailable]
    );
}
