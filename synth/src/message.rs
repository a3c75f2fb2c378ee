//! Chat message for the LLM wire: System / User / Assistant.
//!
//! Conversation turns are rendered into this shape right before a model call;
//! see `From<&Turn> for Message`.

use crate::state::{Role, Turn};

/// One chat message sent to an `LlmClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    System(String),
    User(String),
    Assistant(String),
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }

    /// Message text regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Self::System(s) | Self::User(s) | Self::Assistant(s) => s,
        }
    }
}

/// Renders a turn for the model.
///
/// Tool results go back as user messages (`Tool <name> returned: <text>`); grader
/// reviews are replayed as assistant output. An assistant turn that requested tools
/// mentions the calls so the following tool results have context.
impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        match turn.role {
            Role::User => Message::User(turn.text.clone()),
            Role::Assistant if turn.tool_calls.is_empty() => Message::Assistant(turn.text.clone()),
            Role::Assistant => {
                let calls = turn
                    .tool_calls
                    .iter()
                    .map(|tc| format!("{}({})", tc.name, tc.arguments))
                    .collect::<Vec<_>>()
                    .join(", ");
                if turn.text.trim().is_empty() {
                    Message::Assistant(format!("Calling tools: {}", calls))
                } else {
                    Message::Assistant(format!("{}\n\nCalling tools: {}", turn.text, calls))
                }
            }
            Role::ToolResult => Message::User(format!(
                "Tool {} returned: {}",
                turn.tool_name.as_deref().unwrap_or("unknown"),
                turn.text
            )),
            Role::Grader => Message::Assistant(turn.text.clone()),
        }
    }
}
