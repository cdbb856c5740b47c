//! Application state and event handling.

mod messages;
mod stream;

pub use messages::AppMessage;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::PlannerConfig;
use crate::conversation::{Conversation, ConversationView};
use crate::planner::PlannerClient;
use crate::session::SessionHandle;

/// Top-level application state.
///
/// Owns the conversation reducer, the planner client shared with spawned
/// request tasks, and the message channel those tasks report back on.
/// All transcript mutation happens here, on the event-loop thread.
pub struct App {
    /// Conversation transcript and turn state machine
    pub conversation: Conversation,
    /// Planner API client, shared with spawned request tasks
    pub client: Arc<PlannerClient>,
    /// Use the streaming endpoint; when false, the JSON fallback
    pub streaming: bool,
    /// Current input buffer
    pub input: String,
    /// Active session, if any
    active_session: Option<SessionHandle>,
    /// Monotonic per-conversation generation counter
    generation: u64,
    /// Sender side of the app message channel, cloned into tasks
    pub message_tx: mpsc::UnboundedSender<AppMessage>,
    /// Receiver side; taken by the event loop
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
    /// Set when the user asked to quit
    pub should_quit: bool,
    /// Set when the next loop iteration should redraw
    pub needs_redraw: bool,
    /// Scroll offset from the bottom of the transcript, in lines
    pub scroll: u16,
    /// Tick counter driving the spinner animation
    pub tick_count: u64,
}

impl App {
    /// Create the application state from a config.
    pub fn new(config: &PlannerConfig) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            conversation: Conversation::new(),
            client: Arc::new(PlannerClient::new(config)),
            streaming: config.streaming,
            input: String::new(),
            active_session: None,
            generation: 0,
            message_tx,
            message_rx: Some(message_rx),
            should_quit: false,
            needs_redraw: true,
            scroll: 0,
            tick_count: 0,
        }
    }

    /// Read-only snapshot of the conversation for rendering.
    pub fn view(&self) -> ConversationView<'_> {
        self.conversation.view()
    }

    /// True while a response is in flight and input stays disabled.
    pub fn is_streaming(&self) -> bool {
        self.conversation.is_streaming()
    }

    /// Generation of the active session, if any.
    pub fn active_generation(&self) -> Option<u64> {
        self.active_session.as_ref().map(SessionHandle::generation)
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    /// Advance the animation tick.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if self.is_streaming() {
            self.mark_dirty();
        }
    }

    /// Append a character to the input buffer. Ignored while streaming,
    /// mirroring the disabled input box.
    pub fn push_input_char(&mut self, c: char) {
        if self.is_streaming() {
            return;
        }
        self.input.push(c);
        self.mark_dirty();
    }

    /// Delete the last character of the input buffer.
    pub fn input_backspace(&mut self) {
        if self.is_streaming() {
            return;
        }
        self.input.pop();
        self.mark_dirty();
    }

    /// Scroll the transcript up (towards older entries).
    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
        self.mark_dirty();
    }

    /// Scroll the transcript down (towards the latest entry).
    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
        self.mark_dirty();
    }

    /// Next generation for a new session.
    pub(crate) fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn set_active_session(&mut self, handle: SessionHandle) {
        self.active_session = Some(handle);
    }

    pub(crate) fn take_active_session(&mut self) -> Option<SessionHandle> {
        self.active_session.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_new() {
        let app = App::new(&PlannerConfig::default());
        assert!(app.conversation.entries().is_empty());
        assert!(app.streaming);
        assert!(!app.is_streaming());
        assert!(app.active_generation().is_none());
        assert!(app.message_rx.is_some());
    }

    #[test]
    fn test_input_editing() {
        let mut app = App::new(&PlannerConfig::default());
        app.push_input_char('h');
        app.push_input_char('i');
        assert_eq!(app.input, "hi");
        app.input_backspace();
        assert_eq!(app.input, "h");
    }

    #[test]
    fn test_input_ignored_while_streaming() {
        let mut app = App::new(&PlannerConfig::default());
        app.conversation.begin_send("hi").unwrap();
        app.push_input_char('x');
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_generation_is_monotonic() {
        let mut app = App::new(&PlannerConfig::default());
        let first = app.bump_generation();
        let second = app.bump_generation();
        assert!(second > first);
    }
}
