//! # Diagnostic dump.
//!
//! Renders the controller's scheduling state as text: the resource flag, the
//! current session, and every queued session per UID in scheduling order.
//! Purely diagnostic; the format carries no stability guarantee.

use std::fmt::Write;

use crate::session::OFFLINE_UID;

use super::core::SessionController;

impl SessionController {
    /// Renders a human-readable snapshot of all live sessions.
    ///
    /// ```text
    /// ========== session controller ==========
    ///   total sessions: 2
    ///   resource lost: no
    ///   current session: {client:1, session:1}
    ///   uid 100:
    ///     {client:1, session:1} state=running progress=40
    ///   uid -1 (offline):
    ///     {client:2, session:0} state=not_started progress=0
    /// ```
    pub fn dump(&self) -> String {
        let state = self.state.lock();
        let mut out = String::new();

        let _ = writeln!(out, "========== session controller ==========");
        let _ = writeln!(out, "  total sessions: {}", state.registry.len());
        let _ = writeln!(
            out,
            "  resource lost: {}",
            if state.resource_lost { "yes" } else { "no" }
        );
        match state.current {
            Some(key) => {
                let _ = writeln!(out, "  current session: {key}");
            }
            None => {
                let _ = writeln!(out, "  current session: none");
            }
        }
        for uid in state.queues.uids() {
            if uid == OFFLINE_UID {
                let _ = writeln!(out, "  uid {uid} (offline):");
            } else {
                let _ = writeln!(out, "  uid {uid}:");
            }
            let Some(queue) = state.queues.queue(uid) else {
                continue;
            };
            for &key in queue {
                if let Ok(session) = state.registry.get(key) {
                    let _ = writeln!(
                        out,
                        "    {key} state={} progress={}",
                        session.state.as_label(),
                        session.last_progress
                    );
                }
            }
        }
        out
    }
}
