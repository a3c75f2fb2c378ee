//! Reason node: system prompt + transcript + tool specs → model → assistant turn.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::{ConversationState, Turn};
use crate::tool_source::ToolSpec;

use super::routing::NODE_REASON;

pub struct ReasonNode {
    llm: Arc<dyn LlmClient>,
    tool_specs: Vec<ToolSpec>,
    system_prompt: String,
}

impl ReasonNode {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tool_specs: Vec<ToolSpec>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            tool_specs,
            system_prompt: system_prompt.into(),
        }
    }
}

/// The system prompt followed by every turn rendered as a chat message.
pub fn build_messages(system_prompt: &str, turns: &[Turn]) -> Vec<Message> {
    std::iter::once(Message::system(system_prompt))
        .chain(turns.iter().map(Message::from))
        .collect()
}

#[async_trait]
impl Node<ConversationState> for ReasonNode {
    fn id(&self) -> &str {
        NODE_REASON
    }

    async fn run(
        &self,
        mut state: ConversationState,
    ) -> Result<(ConversationState, Next), AgentError> {
        let messages = build_messages(&self.system_prompt, state.turns());
        let response = self.llm.invoke(&messages, Some(&self.tool_specs)).await?;
        tracing::debug!(
            content_len = response.content.len(),
            tool_calls = response.tool_calls.len(),
            "reasoning step"
        );
        state.record_usage(response.usage.as_ref());
        state.push(Turn::assistant(response.content, response.tool_calls));
        Ok((state, Next::Continue))
    }
}
