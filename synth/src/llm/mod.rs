//! LLM client abstraction for the reasoning and grading steps.
//!
//! Both steps call an [`LlmClient`] with a message list; the reasoning step also passes the
//! tool specs so the model may request tool calls. [`MockLlm`] is a scripted client for
//! tests, [`ChatOpenAI`] talks to the OpenAI Chat Completions API.

mod mock;
mod openai;

pub use mock::{MockLlm, MockRequest};
pub use openai::{ChatOpenAI, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::message::Message;
use crate::state::ToolCall;
use crate::tool_source::ToolSpec;

/// Tool choice mode for chat completions: when tools are present, controls whether
/// the model may choose (auto), must not use (none), or must use (required).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToolChoiceMode {
    /// Model can pick between message or tool calls. Default when tools are present.
    #[default]
    Auto,
    /// Model will not call any tool.
    None,
    /// Model must call one or more tools.
    Required,
}

impl std::str::FromStr for ToolChoiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" => Ok(Self::None),
            "required" => Ok(Self::Required),
            _ => Err(format!(
                "unknown tool_choice: {} (use auto, none, or required)",
                s
            )),
        }
    }
}

/// Token usage for one LLM call (prompt + completion).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    /// Tokens in the prompt (input).
    pub prompt_tokens: u32,
    /// Tokens in the completion (output).
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

/// Response from an LLM completion: assistant text and optional tool calls.
///
/// **Interaction**: Returned by `LlmClient::invoke()`; the reasoning step turns it into an
/// assistant turn, the grading step keeps only `content`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
    /// Tool calls requested in this turn; empty means none.
    pub tool_calls: Vec<ToolCall>,
    /// Token usage for this call, when the provider reports it.
    pub usage: Option<LlmUsage>,
}

impl LlmResponse {
    /// Plain text response without tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// LLM client: given messages (and optionally the tools it may call), returns the
/// assistant text and any tool calls.
///
/// A failed call is an `AgentError`; callers do not retry.
///
/// **Interaction**: Used by the reasoning node (with tools) and the grading node (without).
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(
        &self,
        messages: &[Message],
        tools: Option<&[ToolSpec]>,
    ) -> Result<LlmResponse, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_choice_mode_from_str_parses_known_values() {
        assert_eq!(
            "auto".parse::<ToolChoiceMode>().unwrap(),
            ToolChoiceMode::Auto
        );
        assert_eq!(
            "NONE".parse::<ToolChoiceMode>().unwrap(),
            ToolChoiceMode::None
        );
        assert_eq!(
            "required".parse::<ToolChoiceMode>().unwrap(),
            ToolChoiceMode::Required
        );
        assert!("sometimes".parse::<ToolChoiceMode>().is_err());
    }

    #[test]
    fn llm_response_text_has_no_tool_calls() {
        let r = LlmResponse::text("done");
        assert_eq!(r.content, "done");
        assert!(r.tool_calls.is_empty());
        assert!(r.usage.is_none());
    }
}
