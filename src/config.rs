//! # Controller configuration.
//!
//! [`ControllerConfig`] defines the controller's tunables: event bus capacity
//! and the routing rule for UIDs the activity monitor has never reported.
//!
//! # Example
//! ```
//! use transvisor::ControllerConfig;
//!
//! let mut cfg = ControllerConfig::default();
//! cfg.bus_capacity = 256;
//! cfg.demote_unmonitored = true;
//!
//! assert_eq!(cfg.bus_capacity, 256);
//! ```

/// Configuration for the session controller.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Capacity of the event bus channel.
    ///
    /// When capacity is exceeded, the oldest unsent events are dropped.
    pub bus_capacity: usize,

    /// Routing rule for realtime submits whose UID has no queue yet and is
    /// not reported on top by the activity monitor.
    ///
    /// - `false` (default): enqueue under the supplied UID, just behind every
    ///   foreground UID, and start monitoring it.
    /// - `true`: treat the session as offline and put it on the offline
    ///   queue.
    pub demote_unmonitored: bool,
}

impl Default for ControllerConfig {
    /// Provides a default configuration:
    /// - `bus_capacity = 1024`
    /// - `demote_unmonitored = false`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            demote_unmonitored: false,
        }
    }
}
