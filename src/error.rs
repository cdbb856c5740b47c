//! Error types for planner communication.
//!
//! Parse failures are deliberately absent here: a malformed frame is
//! recovered inside the stream pipeline (logged and skipped) and never
//! surfaces past the decoder/parser boundary.

use thiserror::Error;

/// Errors surfaced by the planner client and stream session.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// HTTP transport failed (connect, DNS, mid-stream read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status on the initial response
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Non-streaming request exceeded the fixed timeout
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The request was cancelled by the caller
    #[error("request was cancelled")]
    Cancelled,

    /// A send was attempted while a response is still streaming
    #[error("a response is still streaming for this conversation")]
    SessionBusy,
}

impl PlannerError {
    /// True when this is the caller's own cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PlannerError::Cancelled)
    }
}
