//! Conversation state: the append-only transcript of one research session.
//!
//! [`ConversationState`] is the single state type that flows through the research graph.
//! Nodes receive it by value, push new [`Turn`]s and hand it on; existing turns are only
//! reachable through shared slices, so nothing already recorded can be edited or reordered.

use serde::{Deserialize, Serialize};

use crate::llm::LlmUsage;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The end user's question.
    User,
    /// Output of the reasoning step (text and/or tool call requests).
    Assistant,
    /// Raw output of one tool invocation, or its error text.
    ToolResult,
    /// Review written by the grading pass.
    Grader,
}

/// One tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Registered tool name, e.g. `arxiv_search`.
    pub name: String,
    /// Arguments as sent by the model; usually a JSON object, sometimes a bare string.
    pub arguments: String,
    /// Provider call id, echoed back on the matching tool-result turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One immutable transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    /// Pending tool calls; only assistant turns carry any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// For tool-result turns: the tool that produced the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// For tool-result turns: the call id being answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::plain(Role::User, text.into())
    }

    pub fn assistant(text: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::plain(Role::Assistant, text.into())
        }
    }

    pub fn tool_result(
        tool_name: impl Into<String>,
        call_id: Option<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: Some(tool_name.into()),
            call_id,
            ..Self::plain(Role::ToolResult, text.into())
        }
    }

    pub fn grader(text: impl Into<String>) -> Self {
        Self::plain(Role::Grader, text.into())
    }

    fn plain(role: Role, text: String) -> Self {
        Self {
            role,
            text,
            tool_calls: Vec::new(),
            tool_name: None,
            call_id: None,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Transcript of one session plus accumulated token usage.
///
/// Persisted by the checkpointer keyed by `session_id`. Usage is bookkeeping only and
/// never influences routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    session_id: String,
    turns: Vec<Turn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_usage: Option<LlmUsage>,
}

impl ConversationState {
    /// Empty transcript for the given session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            turns: Vec::new(),
            total_usage: None,
        }
    }

    /// Empty transcript with a fresh random session id.
    pub fn fresh() -> Self {
        Self::new(new_session_id())
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Appends a turn. The only way to grow the transcript.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn total_usage(&self) -> Option<&LlmUsage> {
        self.total_usage.as_ref()
    }

    /// Adds one call's usage to the running total.
    pub fn record_usage(&mut self, usage: Option<&LlmUsage>) {
        let Some(u) = usage else {
            return;
        };
        self.total_usage = Some(match self.total_usage.take() {
            Some(t) => LlmUsage {
                prompt_tokens: t.prompt_tokens + u.prompt_tokens,
                completion_tokens: t.completion_tokens + u.completion_tokens,
                total_tokens: t.total_tokens + u.total_tokens,
            },
            None => u.clone(),
        });
    }
}

/// New random session id (UUID v4).
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
