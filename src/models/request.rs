//! Request and response bodies for the planner HTTP API.

use serde::{Deserialize, Serialize};

/// Body of both the streaming and non-streaming chat endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub text: String,
}

impl ChatRequest {
    /// Create a new chat request.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Success body of the non-streaming endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub response: Vec<String>,
}

/// Error body returned with a non-success status.
///
/// The backend uses `message` on some routes and `error` on others, so
/// both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Extract whichever message the backend provided.
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}
