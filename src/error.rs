//! # Error types used by the controller and the transcoder backend.
//!
//! This module defines two error enums:
//!
//! - [`ControllerError`] errors returned by the controller's client-facing API.
//! - [`TranscodingErrorCode`] failure codes reported by the transcoder backend
//!   and forwarded to the owning client on session destruction.
//!
//! Both types provide an `as_label` helper for logs/metrics.

use thiserror::Error;

use crate::session::SessionKey;

/// # Errors returned by [`SessionController`](crate::SessionController) API calls.
///
/// These never indicate transcoder failures; a failing transcoder reports
/// through [`SessionController::on_error`](crate::SessionController::on_error)
/// with a [`TranscodingErrorCode`] instead.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError {
    /// A session with the same key was already submitted and is still live.
    #[error("session {key} already exists")]
    AlreadyExists {
        /// The duplicate session key.
        key: SessionKey,
    },
    /// The session key is not in the registry (never submitted, or already
    /// finished, failed or cancelled).
    #[error("session {key} not found")]
    NotFound {
        /// The missing session key.
        key: SessionKey,
    },
}

impl ControllerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ControllerError::AlreadyExists { .. } => "session_already_exists",
            ControllerError::NotFound { .. } => "session_not_found",
        }
    }
}

/// # Failure codes reported by the transcoder backend.
///
/// Delivered to the controller via
/// [`on_error`](crate::SessionController::on_error) and forwarded verbatim to
/// the owning client's
/// [`on_transcoding_failed`](crate::ClientCallback::on_transcoding_failed).
/// The session is destroyed when one of these arrives.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodingErrorCode {
    /// Unclassified backend failure.
    #[error("unknown transcoding error")]
    Unknown,
    /// The source media is malformed and cannot be parsed.
    #[error("malformed source media")]
    Malformed,
    /// The source format or requested target format is not supported.
    #[error("unsupported format")]
    Unsupported,
    /// No writable destination was supplied with the request.
    #[error("no output path")]
    NoOutputPath,
    /// The source bitstream failed validation mid-transcode.
    #[error("invalid bitstream")]
    InvalidBitstream,
    /// The codec resources required by the request cannot be allocated.
    #[error("insufficient codec resources")]
    InsufficientResources,
    /// The backend watchdog fired; the session made no progress in time.
    #[error("watchdog timeout")]
    WatchdogTimeout,
}

impl TranscodingErrorCode {
    /// Returns a short stable label.
    pub fn as_label(&self) -> &'static str {
        match self {
            TranscodingErrorCode::Unknown => "error_unknown",
            TranscodingErrorCode::Malformed => "error_malformed",
            TranscodingErrorCode::Unsupported => "error_unsupported",
            TranscodingErrorCode::NoOutputPath => "error_no_output_path",
            TranscodingErrorCode::InvalidBitstream => "error_invalid_bitstream",
            TranscodingErrorCode::InsufficientResources => "error_insufficient_resources",
            TranscodingErrorCode::WatchdogTimeout => "error_watchdog_timeout",
        }
    }
}
