//! # Outbound command relay for async transcoder backends.
//!
//! The controller calls its [`Transcoder`] while holding the controller-wide
//! lock, so implementations must not block. [`TranscoderRelay`] is the
//! ready-made adapter for backends that live in async land: it implements
//! [`Transcoder`] by pushing [`TranscoderCommand`]s onto an unbounded channel
//! and drains them on a dedicated worker task that awaits an
//! [`AsyncTranscoder`].
//!
//! ## What it guarantees
//! - `start`/`pause`/`resume`/`stop` return immediately, lock held or not.
//! - Commands reach the backend in issue order, one at a time — the
//!   controller's per-session ordering guarantee survives the hop.
//!
//! ## What it does **not** guarantee
//! - Delivery after shutdown: cancelling the token drops whatever is still
//!   queued.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::ClientCallback;
use crate::session::{SessionKey, TranscodingRequest};
use crate::transcoder::Transcoder;

/// One controller command in flight to the backend.
pub enum TranscoderCommand {
    /// Begin executing a new session.
    Start {
        /// Session to start.
        key: SessionKey,
        /// The job description, verbatim from the submit.
        request: TranscodingRequest,
        /// The owning client's notification sink.
        callback: Weak<dyn ClientCallback>,
    },
    /// Suspend the session, keeping progress.
    Pause {
        /// Session to pause.
        key: SessionKey,
    },
    /// Resume a paused session.
    Resume {
        /// Session to resume.
        key: SessionKey,
        /// The job description, verbatim from the submit.
        request: TranscodingRequest,
    },
    /// Abort the session and release its resources.
    Stop {
        /// Session to stop.
        key: SessionKey,
    },
}

/// Async transcoding backend driven by a [`TranscoderRelay`].
///
/// Acks and results still flow back through the controller's event sink;
/// call those from wherever your engine reports completion.
#[async_trait]
pub trait AsyncTranscoder: Send + Sync + 'static {
    /// Begin executing a new session.
    async fn start(
        &self,
        key: SessionKey,
        request: TranscodingRequest,
        callback: Weak<dyn ClientCallback>,
    );

    /// Suspend the session, keeping progress.
    async fn pause(&self, key: SessionKey);

    /// Resume a paused session.
    async fn resume(&self, key: SessionKey, request: TranscodingRequest);

    /// Abort the session and release its resources.
    async fn stop(&self, key: SessionKey);
}

/// Non-blocking [`Transcoder`] that forwards commands to an
/// [`AsyncTranscoder`] via a dedicated drain task.
pub struct TranscoderRelay {
    tx: mpsc::UnboundedSender<TranscoderCommand>,
}

impl TranscoderRelay {
    /// Spawns the drain worker and returns the relay plus the worker handle.
    ///
    /// Must be called from within a tokio runtime. Cancelling `token` stops
    /// the worker; commands issued afterwards are dropped with a warning.
    pub fn spawn(
        backend: Arc<dyn AsyncTranscoder>,
        token: CancellationToken,
    ) -> (Arc<Self>, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<TranscoderCommand>();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    cmd = rx.recv() => {
                        let Some(cmd) = cmd else { break };
                        match cmd {
                            TranscoderCommand::Start { key, request, callback } => {
                                backend.start(key, request, callback).await;
                            }
                            TranscoderCommand::Pause { key } => backend.pause(key).await,
                            TranscoderCommand::Resume { key, request } => {
                                backend.resume(key, request).await;
                            }
                            TranscoderCommand::Stop { key } => backend.stop(key).await,
                        }
                    }
                }
            }
        });

        (Arc::new(Self { tx }), handle)
    }

    fn send(&self, cmd: TranscoderCommand) {
        if self.tx.send(cmd).is_err() {
            eprintln!("[transvisor] transcoder relay worker gone, dropping command");
        }
    }
}

impl Transcoder for TranscoderRelay {
    fn start(
        &self,
        key: SessionKey,
        request: &TranscodingRequest,
        callback: Weak<dyn ClientCallback>,
    ) {
        self.send(TranscoderCommand::Start {
            key,
            request: request.clone(),
            callback,
        });
    }

    fn pause(&self, key: SessionKey) {
        self.send(TranscoderCommand::Pause { key });
    }

    fn resume(&self, key: SessionKey, request: &TranscodingRequest) {
        self.send(TranscoderCommand::Resume {
            key,
            request: request.clone(),
        });
    }

    fn stop(&self, key: SessionKey) {
        self.send(TranscoderCommand::Stop { key });
    }
}
