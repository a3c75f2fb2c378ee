//! Grade node: ask the model whether the latest turn fully answers the question.
//!
//! The model sees only the grading instruction with that turn's text embedded, no history
//! and no tools.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::{ConversationState, Turn};

use super::prompt::grader_prompt;
use super::routing::NODE_GRADE;

pub struct GradeNode {
    llm: Arc<dyn LlmClient>,
}

impl GradeNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<ConversationState> for GradeNode {
    fn id(&self) -> &str {
        NODE_GRADE
    }

    async fn run(
        &self,
        mut state: ConversationState,
    ) -> Result<(ConversationState, Next), AgentError> {
        let last_content = state.last_turn().map(|t| t.text.as_str()).unwrap_or("");
        let messages = [Message::system(grader_prompt(last_content))];
        let response = self.llm.invoke(&messages, None).await?;
        tracing::debug!(verdict = %response.content, "grading step");
        state.record_usage(response.usage.as_ref());
        state.push(Turn::grader(response.content));
        Ok((state, Next::Continue))
    }
}
