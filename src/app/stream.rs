//! Input submission, stream cancellation, and async message handling.

use std::sync::Arc;

use crate::models::ChatRequest;
use crate::session::StreamSession;
use crate::stream::{ReceivedEvent, StreamEvent};

use super::{App, AppMessage};

impl App {
    /// Submit the current input and open a planner session.
    ///
    /// Blank input or an in-flight turn is a no-op: the reducer enforces
    /// the same guard the disabled input box provides in the UI.
    pub fn submit_input(&mut self) {
        let raw = std::mem::take(&mut self.input);
        let Some(text) = self.conversation.begin_send(&raw) else {
            // Nothing was sent; give the input back untouched.
            self.input = raw;
            return;
        };
        self.mark_dirty();
        self.scroll = 0;

        let generation = self.bump_generation();
        let request = ChatRequest::new(text);
        let client = Arc::clone(&self.client);
        let tx = self.message_tx.clone();

        tracing::debug!(generation, streaming = self.streaming, "opening planner session");
        let handle = if self.streaming {
            StreamSession::start(client, request, generation, tx)
        } else {
            StreamSession::start_fallback(client, request, generation, tx)
        };
        self.set_active_session(handle);
    }

    /// Cancel the active session, if any. Idempotent.
    ///
    /// The cancellation is folded into the transcript immediately and
    /// the session slot is cleared, so anything the reader task still
    /// delivers fails the generation check and is dropped.
    pub fn cancel_active_stream(&mut self) {
        let Some(handle) = self.take_active_session() else {
            return;
        };
        tracing::debug!(generation = handle.generation(), "cancelling active stream");
        handle.cancel();
        self.conversation.cancel_turn();
        self.conversation.rearm();
        self.mark_dirty();
    }

    /// Fold one async message into the conversation.
    ///
    /// The generation is checked immediately before every mutation, not
    /// at read time, so an event decoded before a cancellation cannot
    /// land after it.
    pub fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::StreamEvent { generation, event } => {
                if self.active_generation() != Some(generation) {
                    return;
                }
                self.conversation.apply(&event);
                self.mark_dirty();
            }
            AppMessage::StreamComplete { generation } => {
                if self.active_generation() != Some(generation) {
                    return;
                }
                self.conversation.complete_turn();
                self.finish_session();
            }
            AppMessage::StreamError { generation, error } => {
                if self.active_generation() != Some(generation) {
                    return;
                }
                self.conversation.fail(error);
                self.finish_session();
            }
            AppMessage::StreamCancelled { generation } => {
                if self.active_generation() != Some(generation) {
                    return;
                }
                self.conversation.cancel_turn();
                self.finish_session();
            }
            AppMessage::Responses { generation, lines } => {
                if self.active_generation() != Some(generation) {
                    return;
                }
                for text in lines {
                    self.conversation
                        .apply(&ReceivedEvent::now(StreamEvent::AssistantMessage { text }));
                }
                self.conversation.complete_turn();
                self.finish_session();
            }
        }
    }

    /// Release the session slot and re-arm the reducer for the next send.
    fn finish_session(&mut self) {
        self.take_active_session();
        self.conversation.rearm();
        self.mark_dirty();
    }
}
