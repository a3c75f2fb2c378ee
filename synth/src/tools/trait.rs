use async_trait::async_trait;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};

/// A single tool the model can call.
///
/// Each tool has a unique name, a specification (description and JSON schema) and the call
/// logic. Tools are registered with [`ToolRegistry`](super::ToolRegistry), which exposes them
/// as a `ToolSource`.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::Value;
/// use synth::tools::Tool;
/// use synth::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Tool for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn spec(&self) -> ToolSpec {
///         ToolSpec {
///             name: "echo".to_string(),
///             description: Some("Echoes the input".to_string()),
///             input_schema: serde_json::json!({}),
///         }
///     }
///
///     async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
///         Ok(ToolCallContent { text: args.to_string() })
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name; the model refers to the tool by it.
    fn name(&self) -> &str;

    /// Name, description (for the LLM) and JSON schema for arguments.
    fn spec(&self) -> ToolSpec;

    /// Runs the tool. `args` is the parsed argument object, or `Value::String` when the
    /// model sent a bare string.
    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError>;
}
