use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text shown for the typing placeholder entry
pub const TYPING_TEXT: &str = "...";

/// Role of a transcript entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// Discriminates the transcript entries that have special lifecycle rules.
///
/// `Typing` is the single transient placeholder; `ToolProgress` entries
/// are amended in place when their finish/fail event arrives. Everything
/// else is an immutable `Message`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EntryKind {
    /// Plain message content
    Message,
    /// Transient placeholder for an agent response still being produced
    Typing,
    /// Progress line for one tool invocation
    ToolProgress {
        tool_name: String,
        action: String,
        /// Set once the matching finish/fail event has been folded in
        settled: bool,
    },
}

/// One entry of the conversation transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub kind: EntryKind,
}

impl Entry {
    /// Create a user entry.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            created_at: Utc::now(),
            kind: EntryKind::Message,
        }
    }

    /// Create an agent entry.
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            text: text.into(),
            created_at: Utc::now(),
            kind: EntryKind::Message,
        }
    }

    /// Create the typing placeholder entry.
    pub fn typing() -> Self {
        Self {
            role: Role::Agent,
            text: TYPING_TEXT.to_string(),
            created_at: Utc::now(),
            kind: EntryKind::Typing,
        }
    }

    /// Create a progress entry for a tool that just started.
    pub fn tool_started(tool_name: impl Into<String>, action: impl Into<String>) -> Self {
        let tool_name = tool_name.into();
        let action = action.into();
        Self {
            role: Role::Agent,
            text: format!("{}: {}...", tool_name, action),
            created_at: Utc::now(),
            kind: EntryKind::ToolProgress {
                tool_name,
                action,
                settled: false,
            },
        }
    }

    /// Create an already-settled tool entry, used when a finish/fail
    /// event arrives with no matching started entry.
    pub fn tool_settled(
        tool_name: impl Into<String>,
        action: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Agent,
            text: text.into(),
            created_at: Utc::now(),
            kind: EntryKind::ToolProgress {
                tool_name: tool_name.into(),
                action: action.into(),
                settled: true,
            },
        }
    }

    /// True for the typing placeholder.
    pub fn is_typing(&self) -> bool {
        self.kind == EntryKind::Typing
    }

    /// True for a tool entry still waiting for its finish/fail event.
    pub fn is_unsettled_tool(&self, name: &str, act: &str) -> bool {
        matches!(
            &self.kind,
            EntryKind::ToolProgress {
                tool_name,
                action,
                settled: false,
            } if tool_name == name && action == act
        )
    }

    /// Amend this tool entry in place with its final text.
    pub fn settle_tool(&mut self, text: String) {
        if let EntryKind::ToolProgress { settled, .. } = &mut self.kind {
            *settled = true;
            self.text = text;
        }
    }
}
