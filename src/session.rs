//! One in-flight request per conversation.
//!
//! `StreamSession::start` opens the streaming request and spawns the
//! reader task that forwards decoded events to the app over its message
//! channel. The returned `SessionHandle` carries the generation counter
//! that guards against stale deliveries and the abort handle for
//! cancellation.

use std::sync::Arc;

use futures::stream::{AbortHandle, Abortable};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::app::AppMessage;
use crate::models::ChatRequest;
use crate::planner::PlannerClient;
use crate::stream::StreamEvent;

/// Handle to one outstanding request.
///
/// The generation is compared against every delivered message; messages
/// from a superseded or cancelled session are dropped by the receiver
/// immediately before each state mutation, so a decoded event racing a
/// cancellation can never land.
#[derive(Debug)]
pub struct SessionHandle {
    generation: u64,
    abort: AbortHandle,
}

impl SessionHandle {
    pub(crate) fn new(generation: u64, abort: AbortHandle) -> Self {
        Self { generation, abort }
    }

    /// Generation this session was started with.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Abort the underlying transport. Idempotent; calling it on an
    /// already-finished session is a no-op.
    pub fn cancel(&self) {
        self.abort.abort();
    }
}

/// Spawns and owns the reader tasks for planner requests.
pub struct StreamSession;

impl StreamSession {
    /// Open the streaming request and spawn the reader task.
    ///
    /// The task forwards every decoded event in order, then exactly one
    /// terminal message: `StreamComplete` after `conversation_done`,
    /// `complete`, or clean body exhaustion; `StreamError` after
    /// `fatal_error` or a transport failure; `StreamCancelled` after an
    /// abort.
    pub fn start(
        client: Arc<PlannerClient>,
        request: ChatRequest,
        generation: u64,
        tx: mpsc::UnboundedSender<AppMessage>,
    ) -> SessionHandle {
        let (abort, registration) = AbortHandle::new_pair();

        tokio::spawn(async move {
            let stream = match client.stream(&request).await {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::info!(error = %e, "stream request failed to open");
                    let _ = tx.send(AppMessage::StreamError {
                        generation,
                        error: e.to_string(),
                    });
                    return;
                }
            };

            let mut events = Abortable::new(stream, registration);

            while let Some(item) = events.next().await {
                match item {
                    Ok(received) => match received.event {
                        StreamEvent::ConversationDone | StreamEvent::Complete => {
                            let _ = tx.send(AppMessage::StreamEvent {
                                generation,
                                event: received,
                            });
                            let _ = tx.send(AppMessage::StreamComplete { generation });
                            return;
                        }
                        StreamEvent::FatalError { ref message } => {
                            let error = message.clone();
                            let _ = tx.send(AppMessage::StreamEvent {
                                generation,
                                event: received,
                            });
                            let _ = tx.send(AppMessage::StreamError { generation, error });
                            return;
                        }
                        _ => {
                            let _ = tx.send(AppMessage::StreamEvent {
                                generation,
                                event: received,
                            });
                        }
                    },
                    Err(e) => {
                        let _ = tx.send(AppMessage::StreamError {
                            generation,
                            error: e.to_string(),
                        });
                        return;
                    }
                }
            }

            if events.is_aborted() {
                tracing::debug!(generation, "stream aborted by caller");
                let _ = tx.send(AppMessage::StreamCancelled { generation });
            } else {
                // Clean body closure without a terminal event is an
                // implicit successful completion, not an error.
                let _ = tx.send(AppMessage::StreamComplete { generation });
            }
        });

        SessionHandle::new(generation, abort)
    }

    /// Non-streaming fallback: send the request and deliver the full
    /// response as one `Responses` message.
    ///
    /// Cancellation and generation semantics match the streaming path.
    pub fn start_fallback(
        client: Arc<PlannerClient>,
        request: ChatRequest,
        generation: u64,
        tx: mpsc::UnboundedSender<AppMessage>,
    ) -> SessionHandle {
        let (abort, registration) = AbortHandle::new_pair();

        tokio::spawn(async move {
            let send = Abortable::new(
                async move { client.send(&request).await },
                registration,
            );

            match send.await {
                Ok(Ok(lines)) => {
                    let _ = tx.send(AppMessage::Responses { generation, lines });
                }
                Ok(Err(e)) => {
                    let _ = tx.send(AppMessage::StreamError {
                        generation,
                        error: e.to_string(),
                    });
                }
                Err(_aborted) => {
                    let _ = tx.send(AppMessage::StreamCancelled { generation });
                }
            }
        });

        SessionHandle::new(generation, abort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_generation() {
        let (abort, _registration) = AbortHandle::new_pair();
        let handle = SessionHandle::new(7, abort);
        assert_eq!(handle.generation(), 7);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (abort, registration) = AbortHandle::new_pair();
        let handle = SessionHandle::new(1, abort);
        handle.cancel();
        handle.cancel();
        assert!(registration.handle().is_aborted());
    }
}
