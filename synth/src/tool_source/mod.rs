//! Tool source abstraction: list tools and call a tool.
//!
//! The research graph depends on `ToolSource` instead of a concrete tool set; the reasoning
//! step offers `list_tools()` to the model and the act step runs `call_tool(name, args)`.
//! [`ToolRegistry`](crate::tools::ToolRegistry) is the standard implementation.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Tool specification sent to the model.
///
/// **Interaction**: Returned by `ToolSource::list_tools()`; passed to `LlmClient::invoke`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    /// Tool name, e.g. `arxiv_search`.
    pub name: String,
    /// Human-readable description for the LLM.
    pub description: Option<String>,
    /// JSON Schema for arguments.
    pub input_schema: Value,
}

/// Result of a single tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallContent {
    pub text: String,
}

/// Errors from listing or calling tools.
///
/// **Interaction**: The act step never propagates these; it records the error text as the
/// tool result so the model can react to it.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    #[error("transport error: {0}")]
    Transport(String),
    /// The tool ran but reported failure (e.g. a Python exception or a timeout).
    #[error("tool execution failed: {0}")]
    Execution(String),
}

/// Tool source: list tools and call a tool.
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// Available tools, in a stable order.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Call a tool by name with JSON arguments. A bare string argument is passed as
    /// `Value::String`.
    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError>;
}
