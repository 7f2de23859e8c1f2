//! Error types for the docanalyzer library.
//!
//! Every failure of an upload/analysis cycle is a [`DocAnalyzerError`]. The
//! session turns each one into an error [`crate::notify::Notification`] and
//! also returns it, so library callers can branch on [`ErrorKind`] while an
//! interactive front end only has to show the notification.
//!
//! None of these errors is fatal to a [`crate::session::Session`]: after any
//! of them the session is back in a state that accepts a retry.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The backend endpoint a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /api/upload` (text extraction).
    Upload,
    /// `POST /api/analyze` (AI analysis).
    Analyze,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Upload => f.write_str("upload"),
            Endpoint::Analyze => f.write_str("analysis"),
        }
    }
}

/// All errors returned by the docanalyzer library.
#[derive(Debug, Error)]
pub enum DocAnalyzerError {
    // ── Selection errors ──────────────────────────────────────────────────
    /// Upload was triggered with no file selected. No request is made.
    #[error("Please select a file first.")]
    NoFileSelected,

    /// The selected path does not exist.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Backend errors ────────────────────────────────────────────────────
    /// Transport error or non-2xx response from the upload endpoint.
    ///
    /// `message` is the server's `error` field when it sent one, otherwise
    /// the transport-level message.
    #[error("Upload failed: {message}")]
    UploadFailed { message: String, status: Option<u16> },

    /// Transport error or non-2xx response from the analyze endpoint.
    #[error("Analysis failed: {message}")]
    AnalysisFailed { message: String, status: Option<u16> },

    /// A 2xx response whose body is missing the expected fields.
    #[error("Malformed {endpoint} response: {detail}")]
    MalformedResponse { endpoint: Endpoint, detail: String },

    /// The request did not complete within the configured timeout.
    #[error("The {endpoint} request timed out after {secs}s")]
    Timeout { endpoint: Endpoint, secs: u64 },

    /// The in-flight request was cancelled through a [`crate::cancel::CancelHandle`].
    #[error("The {endpoint} request was cancelled")]
    Cancelled { endpoint: Endpoint },

    // ── Session errors ────────────────────────────────────────────────────
    /// An upload cycle is already in flight.
    #[error("A document is already being processed ({phase}); wait for it to finish")]
    Busy { phase: crate::state::AnalysisPhase },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of [`DocAnalyzerError`] for callers that only need
/// to branch on the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoFileSelected,
    UploadFailed,
    AnalysisFailed,
    MalformedResponse,
    Timeout,
    Cancelled,
    Busy,
    InvalidInput,
    InvalidConfig,
    Internal,
}

impl DocAnalyzerError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocAnalyzerError::NoFileSelected => ErrorKind::NoFileSelected,
            DocAnalyzerError::FileNotFound { .. }
            | DocAnalyzerError::PermissionDenied { .. }
            | DocAnalyzerError::FileReadFailed { .. } => ErrorKind::InvalidInput,
            DocAnalyzerError::UploadFailed { .. } => ErrorKind::UploadFailed,
            DocAnalyzerError::AnalysisFailed { .. } => ErrorKind::AnalysisFailed,
            DocAnalyzerError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            DocAnalyzerError::Timeout { .. } => ErrorKind::Timeout,
            DocAnalyzerError::Cancelled { .. } => ErrorKind::Cancelled,
            DocAnalyzerError::Busy { .. } => ErrorKind::Busy,
            DocAnalyzerError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            DocAnalyzerError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The endpoint the error came from, if it came from the backend.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            DocAnalyzerError::UploadFailed { .. } => Some(Endpoint::Upload),
            DocAnalyzerError::AnalysisFailed { .. } => Some(Endpoint::Analyze),
            DocAnalyzerError::MalformedResponse { endpoint, .. }
            | DocAnalyzerError::Timeout { endpoint, .. }
            | DocAnalyzerError::Cancelled { endpoint } => Some(*endpoint),
            _ => None,
        }
    }

    /// HTTP status of a failed backend response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            DocAnalyzerError::UploadFailed { status, .. }
            | DocAnalyzerError::AnalysisFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Build the "request failed" variant matching `endpoint`.
    pub(crate) fn request_failed(
        endpoint: Endpoint,
        message: impl Into<String>,
        status: Option<u16>,
    ) -> Self {
        let message = message.into();
        match endpoint {
            Endpoint::Upload => DocAnalyzerError::UploadFailed { message, status },
            Endpoint::Analyze => DocAnalyzerError::AnalysisFailed { message, status },
        }
    }
}
