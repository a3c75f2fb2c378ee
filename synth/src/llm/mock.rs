//! Mock LLM for tests and offline runs.
//!
//! Replies are scripted in order; once the script runs out the optional fallback reply is
//! returned for every further call. Every request is recorded so tests can check what the
//! model was shown.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;
use crate::state::ToolCall;
use crate::tool_source::ToolSpec;

/// One recorded call to [`MockLlm`].
#[derive(Clone, Debug)]
pub struct MockRequest {
    pub messages: Vec<Message>,
    /// Names of the tools offered; `None` when the call carried no tools.
    pub tool_names: Option<Vec<String>>,
}

/// Scripted LLM.
///
/// ```rust,ignore
/// let llm = MockLlm::new()
///     .then_tool_calls("Searching.", vec![call("arxiv_search", "CRISPR")])
///     .then_reply("Final answer: ...")
///     .then_reply("YES");
/// ```
///
/// **Interaction**: Implements `LlmClient`; stands in for `ChatOpenAI`.
pub struct MockLlm {
    script: Mutex<VecDeque<Result<LlmResponse, String>>>,
    fallback: Option<LlmResponse>,
    requests: Mutex<Vec<MockRequest>>,
}

impl Default for MockLlm {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlm {
    /// Empty script, no fallback: the first call fails.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns the same text and no tool calls on every call.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::new().otherwise(LlmResponse::text(content))
    }

    /// Queues a full response.
    pub fn then_respond(self, response: LlmResponse) -> Self {
        self.push(Ok(response))
    }

    /// Queues a text-only reply.
    pub fn then_reply(self, content: impl Into<String>) -> Self {
        self.then_respond(LlmResponse::text(content))
    }

    /// Queues a reply that requests tool calls.
    pub fn then_tool_calls(self, content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        self.then_respond(LlmResponse {
            content: content.into(),
            tool_calls,
            usage: None,
        })
    }

    /// Queues a failed call.
    pub fn then_fail(self, error: impl Into<String>) -> Self {
        self.push(Err(error.into()))
    }

    /// Reply used once the script is exhausted.
    pub fn otherwise(mut self, response: LlmResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    fn push(self, item: Result<LlmResponse, String>) -> Self {
        if let Ok(mut q) = self.script.lock() {
            q.push_back(item);
        }
        self
    }

    /// All calls made so far, oldest first.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Scripted replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(
        &self,
        messages: &[Message],
        tools: Option<&[ToolSpec]>,
    ) -> Result<LlmResponse, AgentError> {
        if let Ok(mut r) = self.requests.lock() {
            r.push(MockRequest {
                messages: messages.to_vec(),
                tool_names: tools.map(|ts| ts.iter().map(|t| t.name.clone()).collect()),
            });
        }
        let next = self.script.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(e)) => Err(AgentError::ExecutionFailed(e)),
            None => self.fallback.clone().ok_or_else(|| {
                AgentError::ExecutionFailed("mock llm: script exhausted".to_string())
            }),
        }
    }
}
