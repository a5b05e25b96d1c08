//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints controller events to stdout in a human-readable
//! format. This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [submitted] session={client:1, session:1} uid=100
//! [started] session={client:1, session:1}
//! [paused] session={client:1, session:1}
//! [failed] session={client:1, session:1} err="invalid bitstream"
//! [progress] session={client:1, session:1} progress=42
//! [top-uids-changed] reason="{200}"
//! [resource-lost]
//! [spurious] reason="finish for unknown session"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Not intended for production use —
/// implement a custom [`Subscribe`] for structured logging or metrics.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::SessionSubmitted => {
                if let (Some(session), Some(uid)) = (e.session, e.uid) {
                    println!("[submitted] session={session} uid={uid}");
                }
            }
            EventKind::SessionRejected => {
                println!("[rejected] session={:?} reason={:?}", e.session, e.reason);
            }
            EventKind::SessionStarted => {
                if let Some(session) = e.session {
                    println!("[started] session={session}");
                }
            }
            EventKind::SessionPaused => {
                if let Some(session) = e.session {
                    println!("[paused] session={session}");
                }
            }
            EventKind::SessionResumed => {
                if let Some(session) = e.session {
                    println!("[resumed] session={session}");
                }
            }
            EventKind::SessionFinished => {
                if let Some(session) = e.session {
                    println!("[finished] session={session}");
                }
            }
            EventKind::SessionFailed => {
                println!("[failed] session={:?} err={:?}", e.session, e.error);
            }
            EventKind::SessionCancelled => {
                if let Some(session) = e.session {
                    println!("[cancelled] session={session}");
                }
            }
            EventKind::ProgressUpdated => {
                if let (Some(session), Some(progress)) = (e.session, e.progress) {
                    println!("[progress] session={session} progress={progress}");
                }
            }
            EventKind::TopUidsChanged => {
                println!("[top-uids-changed] reason={:?}", e.reason);
            }
            EventKind::ResourceLost => {
                println!("[resource-lost]");
            }
            EventKind::ResourceAvailable => {
                println!("[resource-available]");
            }
            EventKind::SpuriousCallback => {
                println!("[spurious] reason={:?}", e.reason);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
