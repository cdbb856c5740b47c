//! Planner API client for backend communication.
//!
//! This module provides the HTTP client for interacting with the planner
//! backend: the streaming chat endpoint, the non-streaming JSON fallback,
//! and the health probe.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use reqwest::Client;

use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::models::{ApiErrorBody, ChatRequest, ChatResponse};
use crate::stream::{parse_frame, FrameDecoder, ReceivedEvent};

/// A lazily decoded stream of planner events.
///
/// Finite (bounded by the underlying HTTP body) and not restartable once
/// the body is exhausted.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ReceivedEvent, PlannerError>> + Send>>;

/// Client for the planner backend API.
pub struct PlannerClient {
    base_url: String,
    request_timeout: Duration,
    client: Client,
}

impl PlannerClient {
    /// Create a new client from a config.
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            client: Client::new(),
        }
    }

    /// Create a new client with a custom base URL and default timeout.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(&PlannerConfig::default().with_base_url(base_url))
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stream a conversation response from the planner.
    ///
    /// Sends `POST /planner/stream` and returns a stream of typed
    /// events. A non-success initial response is reported as
    /// `PlannerError::Server` without attempting any event reads.
    /// Malformed frames inside the body are logged and skipped; they
    /// never abort the stream.
    pub async fn stream(&self, request: &ChatRequest) -> Result<EventStream, PlannerError> {
        let url = format!("{}/planner/stream", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(request)
            .send()
            .await?;

        let response = check_status(response).await?;

        let bytes_stream = response.bytes_stream();

        let event_stream = stream::unfold(
            (bytes_stream, FrameDecoder::new(), VecDeque::<String>::new()),
            |(mut bytes_stream, mut decoder, mut pending)| async move {
                loop {
                    // Drain frames decoded from earlier chunks first.
                    while let Some(payload) = pending.pop_front() {
                        match parse_frame(&payload) {
                            Ok(event) => {
                                return Some((Ok(event), (bytes_stream, decoder, pending)));
                            }
                            Err(e) => {
                                // A single malformed frame never aborts the stream.
                                tracing::warn!(error = %e, frame = %payload, "skipping malformed stream frame");
                            }
                        }
                    }

                    // Need more data from the body.
                    match bytes_stream.next().await {
                        Some(Ok(chunk)) => {
                            pending.extend(decoder.push(&chunk));
                        }
                        Some(Err(e)) => {
                            return Some((
                                Err(PlannerError::Http(e)),
                                (bytes_stream, decoder, pending),
                            ));
                        }
                        None => {
                            if let Some(tail) = decoder.finish() {
                                tracing::debug!(frame = %tail, "discarding incomplete trailing frame");
                            }
                            return None;
                        }
                    }
                }
            },
        );

        Ok(Box::pin(event_stream))
    }

    /// Non-streaming fallback: send the message and wait for the full
    /// response.
    ///
    /// Uses `Accept: application/json` and a fixed request timeout,
    /// after which the pending request is aborted and reported as
    /// `PlannerError::Timeout`.
    pub async fn send(&self, request: &ChatRequest) -> Result<Vec<String>, PlannerError> {
        let url = format!("{}/planner/", self.base_url);

        let result = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Err(PlannerError::Timeout(self.request_timeout.as_secs()))
            }
            Err(e) => return Err(e.into()),
        };

        let response = check_status(response).await?;
        let body: ChatResponse = response.json().await?;
        Ok(body.response)
    }

    /// Check if the planner backend is healthy and reachable.
    pub async fn health_check(&self) -> Result<bool, PlannerError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        Ok(response.status().is_success())
    }
}

/// Turn a non-success response into a `Server` error carrying the
/// backend-provided message when one is parseable.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PlannerError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(ApiErrorBody::into_message)
        .unwrap_or_else(|| format!("server returned status {}", status));

    Err(PlannerError::Server { status, message })
}
