//! Shared fixtures for the research integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use synth::tools::{string_arg, Tool};
use synth::{ConversationState, ToolCall, ToolCallContent, ToolRegistry, ToolSourceError, ToolSpec, Turn};

/// Echoes its query back as `<name>: <query>`.
pub struct EchoTool {
    pub name: &'static str,
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        self.name
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.to_string(),
            description: Some(format!("Echo tool {}", self.name)),
            input_schema: json!({"type": "object", "properties": {"query": {"type": "string"}}}),
        }
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let query = string_arg(&args, "query")?;
        Ok(ToolCallContent {
            text: format!("{}: {}", self.name, query),
        })
    }
}

/// Always fails with a transport error.
pub struct FailingTool {
    pub name: &'static str,
}

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        self.name
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.to_string(),
            description: None,
            input_schema: json!({}),
        }
    }

    async fn call(&self, _args: Value) -> Result<ToolCallContent, ToolSourceError> {
        Err(ToolSourceError::Transport("service unavailable".into()))
    }
}

/// Registry with `arxiv_search` echoing and `pubmed_search` failing.
pub fn research_tools() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(EchoTool {
        name: "arxiv_search",
    }));
    registry.register(Box::new(FailingTool {
        name: "pubmed_search",
    }));
    registry
}

pub fn call(name: &str, arguments: &str, id: &str) -> ToolCall {
    ToolCall {
        name: name.to_string(),
        arguments: arguments.to_string(),
        id: Some(id.to_string()),
    }
}

pub fn state_with(turns: Vec<Turn>) -> ConversationState {
    let mut s = ConversationState::new("test-session");
    for t in turns {
        s.push(t);
    }
    s
}

/// True when `before` is a prefix of `after`.
pub fn is_prefix(before: &ConversationState, after: &ConversationState) -> bool {
    after.turns().len() >= before.turns().len()
        && after.turns()[..before.turns().len()] == *before.turns()
}
