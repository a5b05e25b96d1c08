//! # Non-blocking fan-out of controller events.
//!
//! [`SubscriberSet`] hands each controller [`Event`] to a group of
//! subscribers without ever waiting on them: every subscriber gets its own
//! bounded queue and worker task, a slow or panicking subscriber only hurts
//! itself, and `emit` returns immediately — safe to call from a thread that
//! is pumping the controller's bus.
//!
//! ```text
//!    emit(&Event)
//!        │                      (Arc-clone per subscriber)
//!        ├──► [queue A] ──► worker A ──► on_event()
//!        └──► [queue B] ──► worker B ──► on_event()
//! ```
//!
//! Events are dropped per-subscriber on queue overflow and are never retried;
//! there is no ordering guarantee across different subscribers.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::Event;

use super::Subscribe;

struct Lane {
    name: &'static str,
    queue: mpsc::Sender<Arc<Event>>,
}

/// Fan-out over multiple subscribers, one bounded queue and worker each.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates the set and spawns one worker per subscriber.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut lanes = Vec::with_capacity(subscribers.len());
        let mut workers = Vec::with_capacity(subscribers.len());
        for subscriber in subscribers {
            let (queue, rx) = mpsc::channel(subscriber.queue_capacity().max(1));
            lanes.push(Lane {
                name: subscriber.name(),
                queue,
            });
            workers.push(Self::spawn_worker(subscriber, rx));
        }
        Self { lanes, workers }
    }

    /// Hands one event to every subscriber's queue without blocking.
    ///
    /// A full or closed queue drops the event for that subscriber only, with
    /// a note on stderr.
    pub fn emit(&self, event: &Event) {
        let event = Arc::new(event.clone());
        for lane in &self.lanes {
            if let Err(err) = lane.queue.try_send(Arc::clone(&event)) {
                let why = match err {
                    mpsc::error::TrySendError::Full(_) => "queue full",
                    mpsc::error::TrySendError::Closed(_) => "worker closed",
                };
                eprintln!("[transvisor] subscriber '{}' dropped event: {why}", lane.name);
            }
        }
    }

    /// Closes every queue and waits for the workers to finish draining.
    pub async fn shutdown(self) {
        drop(self.lanes);
        for worker in self.workers {
            let _ = worker.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    fn spawn_worker(
        subscriber: Arc<dyn Subscribe>,
        mut rx: mpsc::Receiver<Arc<Event>>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let handled = std::panic::AssertUnwindSafe(subscriber.on_event(event.as_ref()))
                    .catch_unwind()
                    .await;
                if let Err(panic_err) = handled {
                    eprintln!(
                        "[transvisor] subscriber '{}' panicked: {panic_err:?}",
                        subscriber.name()
                    );
                }
            }
        })
    }
}
