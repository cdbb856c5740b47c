//! Stream event types and definitions
//!
//! Contains the StreamEvent enum with all possible event variants from the
//! planner streaming API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Typed events from the planner streaming API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Progress note for the auxiliary status line
    Status { message: String },
    /// Backend acknowledgement of the user message (already echoed locally)
    UserEcho,
    /// A complete assistant utterance
    AssistantMessage { text: String },
    /// A tool invocation began
    ToolStarted { tool_name: String, action: String },
    /// A tool invocation finished
    ToolFinished {
        tool_name: String,
        action: String,
        result_summary: String,
    },
    /// A tool invocation failed
    ToolFailed {
        tool_name: String,
        action: String,
        message: String,
    },
    /// Logical end of the conversation turn
    ConversationDone,
    /// Terminal backend failure
    FatalError { message: String },
    /// Transport-level completion sentinel
    Complete,
}

impl StreamEvent {
    /// Event type names recognized on the wire, in tag form.
    pub const KNOWN_TYPES: [&'static str; 9] = [
        "status",
        "user_echo",
        "assistant_message",
        "tool_started",
        "tool_finished",
        "tool_failed",
        "conversation_done",
        "fatal_error",
        "complete",
    ];

    /// Returns the event type name as a string for logging purposes.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::Status { .. } => "status",
            StreamEvent::UserEcho => "user_echo",
            StreamEvent::AssistantMessage { .. } => "assistant_message",
            StreamEvent::ToolStarted { .. } => "tool_started",
            StreamEvent::ToolFinished { .. } => "tool_finished",
            StreamEvent::ToolFailed { .. } => "tool_failed",
            StreamEvent::ConversationDone => "conversation_done",
            StreamEvent::FatalError { .. } => "fatal_error",
            StreamEvent::Complete => "complete",
        }
    }

    /// True for events that end the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamEvent::ConversationDone
                | StreamEvent::FatalError { .. }
                | StreamEvent::Complete
        )
    }
}

/// A stream event stamped with the local receive time.
///
/// The timestamp is assigned by the parser, not the sender, so events
/// order deterministically even when the sender's clock is skewed. Any
/// timestamp carried in the payload is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedEvent {
    pub event: StreamEvent,
    pub received_at: DateTime<Utc>,
}

impl ReceivedEvent {
    /// Wrap an event with the current local time.
    pub fn now(event: StreamEvent) -> Self {
        Self {
            event,
            received_at: Utc::now(),
        }
    }
}

/// Errors that can occur while parsing a stream frame
#[derive(Debug, Clone, PartialEq)]
pub enum StreamParseError {
    /// Payload was not valid JSON
    InvalidJson { source: String },
    /// Payload had no `type` tag
    MissingType,
    /// Unknown event type received
    UnknownEventType(String),
    /// Known event type with a malformed payload
    InvalidPayload {
        event_type: String,
        source: String,
    },
}

impl std::fmt::Display for StreamParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamParseError::InvalidJson { source } => {
                write!(f, "Invalid JSON in stream frame: {}", source)
            }
            StreamParseError::MissingType => write!(f, "Stream frame has no type tag"),
            StreamParseError::UnknownEventType(t) => {
                write!(f, "Unknown stream event type: {}", t)
            }
            StreamParseError::InvalidPayload { event_type, source } => {
                write!(f, "Invalid payload for event '{}': {}", event_type, source)
            }
        }
    }
}

impl std::error::Error for StreamParseError {}
