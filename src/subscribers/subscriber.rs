//! # Event subscriber trait.
//!
//! Provides [`Subscribe`] — the extension point for plugging custom event
//! handlers (metrics, audit trails, structured logging) into the controller's
//! event stream.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently)
//! - **Bounded queue** (configurable capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics caught and reported to stderr)
//!
//! ## Rules
//! - Slow subscribers only affect themselves (queue overflow → event drop)
//! - Panics do not crash the controller or other subscribers
//! - Subscribers never block the controller's entry points

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for controller observability.
///
/// Receives events via a dedicated worker task with a bounded queue.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from the subscriber's worker task, in publish order. Handle
    /// errors internally; a panic is caught and reported, and the worker
    /// keeps going.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name for overflow/panic reports.
    ///
    /// Keep short and descriptive (e.g., "metrics", "audit").
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber.
    ///
    /// When the queue is full, new events are dropped for this subscriber
    /// only.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
