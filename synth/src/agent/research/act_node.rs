//! Act node: run every tool call of the latest assistant turn, one tool-result turn each.
//!
//! Tool failures (unknown tool, bad arguments, transport or execution errors) never abort
//! the run; the error is rendered through the error template and recorded as the result.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::state::{ConversationState, Role, Turn};
use crate::tool_source::{ToolSource, ToolSourceError};

use super::routing::NODE_ACT;

/// Error text recorded when a tool call fails.
pub const DEFAULT_TOOL_ERROR_TEMPLATE: &str =
    "Error executing tool '{tool_name}' with kwargs {tool_kwargs} with error:\n {error}\n Please fix the error and try again.";

fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Parses a tool call's argument string.
///
/// Blank → `{}`; JSON → that value (a JSON string holding an object is unwrapped once);
/// anything else → `Value::String(raw)`, since models often send a bare query.
pub fn parse_tool_arguments(arguments: &str) -> Value {
    let trimmed = arguments.trim();
    if trimmed.is_empty() {
        return serde_json::json!({});
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(inner)) => match serde_json::from_str::<Value>(&inner) {
            Ok(v @ Value::Object(_)) => v,
            _ => Value::String(inner),
        },
        Ok(v) => v,
        Err(_) => Value::String(trimmed.to_string()),
    }
}

/// Renders `template` with `{tool_name}`, `{tool_kwargs}` and `{error}`.
pub fn render_tool_error(
    template: &str,
    tool_name: &str,
    args: &Value,
    error: &ToolSourceError,
) -> String {
    template
        .replace("{tool_name}", tool_name)
        .replace("{tool_kwargs}", &args.to_string())
        .replace("{error}", &error.to_string())
}

pub struct ActNode {
    tools: Arc<dyn ToolSource>,
    error_template: String,
}

impl ActNode {
    pub fn new(tools: Arc<dyn ToolSource>) -> Self {
        Self {
            tools,
            error_template: DEFAULT_TOOL_ERROR_TEMPLATE.to_string(),
        }
    }

    pub fn with_error_template(mut self, template: impl Into<String>) -> Self {
        self.error_template = template.into();
        self
    }
}

#[async_trait]
impl Node<ConversationState> for ActNode {
    fn id(&self) -> &str {
        NODE_ACT
    }

    async fn run(
        &self,
        mut state: ConversationState,
    ) -> Result<(ConversationState, Next), AgentError> {
        let calls = match state.last_turn() {
            Some(t) if t.role == Role::Assistant => t.tool_calls.clone(),
            _ => Vec::new(),
        };
        if calls.is_empty() {
            warn!("act step reached without pending tool calls");
        }

        for tc in calls {
            let args = parse_tool_arguments(&tc.arguments);
            debug!(tool = %tc.name, args = %args, "Calling tool");
            let text = match self.tools.call_tool(&tc.name, args.clone()).await {
                Ok(content) => {
                    trace!(
                        tool = %tc.name,
                        result_len = content.text.len(),
                        result_preview = %truncate_for_log(&content.text, 200),
                        "Tool returned"
                    );
                    content.text
                }
                Err(e) => {
                    warn!(tool = %tc.name, error = %e, "Tool call failed");
                    render_tool_error(&self.error_template, &tc.name, &args, &e)
                }
            };
            state.push(Turn::tool_result(tc.name, tc.id, text));
        }
        Ok((state, Next::Continue))
    }
}
