//! # Priority and resource policy interfaces.
//!
//! Two collaborator traits feed the controller's scheduling decisions:
//!
//! - [`UidPolicy`] — the OS activity monitor. The controller registers every
//!   UID it sees in a submit, queries which UIDs are in the foreground, and
//!   receives push notifications through
//!   [`on_top_uids_changed`](crate::SessionController::on_top_uids_changed).
//! - [`ResourcePolicy`] — the codec-resource arbiter. The controller
//!   registers the submitting process of every live session and receives
//!   [`on_resource_available`](crate::SessionController::on_resource_available)
//!   pushes when reclaimed codec hardware is handed back.
//!
//! Both are invoked under the controller lock and must not block or re-enter
//! the controller synchronously.

use std::collections::HashSet;

use crate::session::Uid;

/// OS activity monitor: which app UIDs are in the foreground.
pub trait UidPolicy: Send + Sync {
    /// Starts watching `uid` for foreground/background changes. Called the
    /// first time a submit creates a queue for the UID.
    fn register_monitor(&self, uid: Uid);

    /// Stops watching `uid`. Called when the UID's last session is removed.
    fn unregister_monitor(&self, uid: Uid);

    /// True if `uid` is currently a foreground (top) UID.
    fn is_uid_on_top(&self, uid: Uid) -> bool;

    /// The current set of foreground UIDs.
    fn top_uids(&self) -> HashSet<Uid>;
}

/// Codec-resource arbiter: who to tell that this process needs the codec.
pub trait ResourcePolicy: Send + Sync {
    /// Registers interest in resource availability on behalf of the client
    /// process `pid`. Called once per accepted session.
    fn register_monitor(&self, pid: i32);

    /// Withdraws the registration made for `pid` when its session ends.
    fn unregister_monitor(&self, pid: i32);
}
