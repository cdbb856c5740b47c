//! AppMessage enum for async communication within the application.

use crate::stream::ReceivedEvent;

/// Messages received from async operations (streaming, fallback requests).
///
/// Every message carries the generation of the session that produced it;
/// the receiver drops anything from a superseded or cancelled session.
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// A decoded event from the active stream
    StreamEvent {
        generation: u64,
        event: ReceivedEvent,
    },
    /// Streaming completed successfully
    StreamComplete { generation: u64 },
    /// Streaming ended with an error
    StreamError { generation: u64, error: String },
    /// Stream was cancelled by user request
    StreamCancelled { generation: u64 },
    /// Non-streaming fallback returned its response lines
    Responses {
        generation: u64,
        lines: Vec<String>,
    },
}
