//! Tests for the async outbound relay.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use transvisor::{
    AsyncTranscoder, ClientCallback, SessionKey, Transcoder, TranscoderRelay, TranscodingRequest,
};

#[derive(Debug, PartialEq, Eq)]
enum Received {
    Start(SessionKey),
    Pause(SessionKey),
    Resume(SessionKey),
    Stop(SessionKey),
}

struct RecordingBackend {
    tx: mpsc::UnboundedSender<Received>,
}

#[async_trait]
impl AsyncTranscoder for RecordingBackend {
    async fn start(
        &self,
        key: SessionKey,
        _request: TranscodingRequest,
        _callback: Weak<dyn ClientCallback>,
    ) {
        let _ = self.tx.send(Received::Start(key));
    }

    async fn pause(&self, key: SessionKey) {
        let _ = self.tx.send(Received::Pause(key));
    }

    async fn resume(&self, key: SessionKey, _request: TranscodingRequest) {
        let _ = self.tx.send(Received::Resume(key));
    }

    async fn stop(&self, key: SessionKey) {
        let _ = self.tx.send(Received::Stop(key));
    }
}

struct NoClient;

impl ClientCallback for NoClient {
    fn on_transcoding_started(&self, _: i32) {}
    fn on_transcoding_paused(&self, _: i32) {}
    fn on_transcoding_resumed(&self, _: i32) {}
    fn on_transcoding_finished(&self, _: i32) {}
    fn on_transcoding_failed(&self, _: i32, _: transvisor::TranscodingErrorCode) {}
    fn on_progress_update(&self, _: i32, _: i32) {}
    fn on_resume_pending(&self, _: i32) {}
}

#[tokio::test]
async fn commands_reach_the_backend_in_issue_order() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let token = CancellationToken::new();
    let (relay, worker) = TranscoderRelay::spawn(Arc::new(RecordingBackend { tx }), token.clone());

    let key = SessionKey::new(1, 1);
    let request = TranscodingRequest::default();
    let callback: Weak<dyn ClientCallback> = Weak::<NoClient>::new();

    relay.start(key, &request, callback);
    relay.pause(key);
    relay.resume(key, &request);
    relay.stop(key);

    assert_eq!(rx.recv().await, Some(Received::Start(key)));
    assert_eq!(rx.recv().await, Some(Received::Pause(key)));
    assert_eq!(rx.recv().await, Some(Received::Resume(key)));
    assert_eq!(rx.recv().await, Some(Received::Stop(key)));

    token.cancel();
    worker.await.unwrap();
}

#[tokio::test]
async fn cancelling_the_token_stops_the_worker() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let token = CancellationToken::new();
    let (relay, worker) = TranscoderRelay::spawn(Arc::new(RecordingBackend { tx }), token.clone());

    token.cancel();
    worker.await.unwrap();

    // Commands after shutdown are dropped, not delivered and not panicking.
    relay.pause(SessionKey::new(1, 1));
    assert_eq!(rx.recv().await, None);
}
