//! Conversation state: the transcript reducer.
//!
//! The reducer is the only owner of the transcript. Stream events are
//! folded in the exact order they were decoded. The transcript is
//! append-only, with two exceptions: the single typing placeholder is
//! removed and re-inserted (never edited), and a tool progress entry is
//! amended in place when its matching finish/fail event arrives.

use crate::models::Entry;
use crate::stream::{ReceivedEvent, StreamEvent};

/// Synthetic agent entry appended on every terminal failure.
const APOLOGY_TEXT: &str = "Sorry, something went wrong while handling that. Please try again.";

/// Lifecycle of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No request outstanding; input is accepted
    #[default]
    Idle,
    /// Request sent, nothing decoded yet
    AwaitingFirstEvent,
    /// At least one event folded in
    Streaming,
    /// Turn ended; waiting for callbacks to settle before re-arming
    Terminal,
}

/// Read-only view of the conversation, the surface consumed by the UI.
#[derive(Debug, Clone, Copy)]
pub struct ConversationView<'a> {
    pub transcript: &'a [Entry],
    pub status: Option<&'a str>,
    pub is_streaming: bool,
    pub last_error: Option<&'a str>,
}

/// The transcript and turn state machine for one conversation.
#[derive(Debug, Default)]
pub struct Conversation {
    entries: Vec<Entry>,
    status: Option<String>,
    last_error: Option<String>,
    phase: Phase,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True while a turn is in flight and input should stay disabled.
    pub fn is_streaming(&self) -> bool {
        matches!(self.phase, Phase::AwaitingFirstEvent | Phase::Streaming)
    }

    /// Read-only snapshot for rendering.
    pub fn view(&self) -> ConversationView<'_> {
        ConversationView {
            transcript: &self.entries,
            status: self.status.as_deref(),
            is_streaming: self.is_streaming(),
            last_error: self.last_error.as_deref(),
        }
    }

    /// Start a turn.
    ///
    /// Returns the sanitized text to transmit. Blank input, or a send
    /// while a turn is already in flight, is a no-op returning `None` -
    /// the UI disables its input for the same cases, but the guard holds
    /// here too for non-UI callers.
    pub fn begin_send(&mut self, raw: &str) -> Option<String> {
        let text = sanitize_input(raw);
        if text.is_empty() || self.phase != Phase::Idle {
            return None;
        }

        self.last_error = None;
        self.entries.push(Entry::user(text.clone()));
        self.entries.push(Entry::typing());
        self.phase = Phase::AwaitingFirstEvent;
        Some(text)
    }

    /// Fold one decoded event into the transcript.
    ///
    /// Events arriving outside an active turn are ignored; the
    /// generation guard upstream should already have dropped them.
    pub fn apply(&mut self, received: &ReceivedEvent) {
        if !self.turn_active() {
            return;
        }

        match &received.event {
            StreamEvent::Status { message } => {
                self.phase = Phase::Streaming;
                self.status = Some(message.clone());
            }
            StreamEvent::UserEcho => {
                // The user entry was echoed locally at send time.
                self.phase = Phase::Streaming;
            }
            StreamEvent::AssistantMessage { text } => {
                self.phase = Phase::Streaming;
                self.remove_placeholder();
                self.entries.push(Entry::agent(text.clone()));
                // More events may follow this message; the terminal
                // transition removes the placeholder again if not.
                self.entries.push(Entry::typing());
            }
            StreamEvent::ToolStarted { tool_name, action } => {
                self.phase = Phase::Streaming;
                self.insert_before_placeholder(Entry::tool_started(tool_name, action));
            }
            StreamEvent::ToolFinished {
                tool_name,
                action,
                result_summary,
            } => {
                self.phase = Phase::Streaming;
                let text = format!("{}: {} - {}", tool_name, action, result_summary);
                self.settle_tool(tool_name, action, text);
            }
            StreamEvent::ToolFailed {
                tool_name,
                action,
                message,
            } => {
                self.phase = Phase::Streaming;
                let text = format!("{}: {} failed: {}", tool_name, action, message);
                self.settle_tool(tool_name, action, text);
            }
            StreamEvent::ConversationDone | StreamEvent::Complete => {
                self.complete_turn();
            }
            StreamEvent::FatalError { message } => {
                self.fail(message.clone());
            }
        }
    }

    /// Terminal success. Idempotent; safe to call again after the
    /// terminal event already completed the turn.
    pub fn complete_turn(&mut self) {
        if !self.turn_active() {
            return;
        }
        self.remove_placeholder();
        self.status = None;
        self.phase = Phase::Terminal;
    }

    /// Terminal failure: record the error and apologize once.
    pub fn fail(&mut self, message: impl Into<String>) {
        if !self.turn_active() {
            return;
        }
        self.remove_placeholder();
        self.status = None;
        self.last_error = Some(message.into());
        self.entries.push(Entry::agent(APOLOGY_TEXT));
        self.phase = Phase::Terminal;
    }

    /// Terminal cancellation. Not an error: `last_error` stays clear.
    pub fn cancel_turn(&mut self) {
        if !self.turn_active() {
            return;
        }
        self.remove_placeholder();
        self.status = None;
        self.phase = Phase::Terminal;
    }

    /// Re-arm for the next send once terminal callbacks have settled.
    pub fn rearm(&mut self) {
        if self.phase == Phase::Terminal {
            self.phase = Phase::Idle;
        }
    }

    fn turn_active(&self) -> bool {
        matches!(self.phase, Phase::AwaitingFirstEvent | Phase::Streaming)
    }

    fn remove_placeholder(&mut self) {
        self.entries.retain(|e| !e.is_typing());
    }

    fn insert_before_placeholder(&mut self, entry: Entry) {
        match self.entries.iter().rposition(Entry::is_typing) {
            Some(pos) => self.entries.insert(pos, entry),
            None => self.entries.push(entry),
        }
    }

    /// Amend the most recent unmatched started entry for this tool, or
    /// append a standalone entry when none exists.
    fn settle_tool(&mut self, tool_name: &str, action: &str, text: String) {
        let slot = self
            .entries
            .iter_mut()
            .rev()
            .find(|e| e.is_unsettled_tool(tool_name, action));
        match slot {
            Some(entry) => entry.settle_tool(text),
            None => self.insert_before_placeholder(Entry::tool_settled(tool_name, action, text)),
        }
    }
}

/// HTML-escape user text before it is stored or transmitted, so
/// transcripts are safe to render as markup elsewhere.
pub fn sanitize_input(input: &str) -> String {
    input
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
        .trim()
        .to_string()
}
