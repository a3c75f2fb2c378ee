//! `python_repl`: runs a Python snippet in a child process and returns its output.
//!
//! Each call is a fresh `python3 -c <code>` process; nothing carries over between calls.
//! Markdown code fences around the snippet are stripped first.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::args::string_arg;
use crate::tools::Tool;

pub const TOOL_PYTHON_REPL: &str = "python_repl";

pub const DEFAULT_PYTHON_BIN: &str = "python3";
pub const DEFAULT_PYTHON_TIMEOUT: Duration = Duration::from_secs(30);

/// Removes surrounding whitespace and ``` / ```python fences.
pub fn sanitize_code(code: &str) -> String {
    let trimmed = code.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let rest = rest
        .strip_prefix("python")
        .or_else(|| rest.strip_prefix("py"))
        .unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim().to_string()
}

pub struct PythonReplTool {
    python_bin: String,
    timeout: Duration,
}

impl Default for PythonReplTool {
    fn default() -> Self {
        Self::new(DEFAULT_PYTHON_BIN, DEFAULT_PYTHON_TIMEOUT)
    }
}

impl PythonReplTool {
    pub fn new(python_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            python_bin: python_bin.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Tool for PythonReplTool {
    fn name(&self) -> &str {
        TOOL_PYTHON_REPL
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_PYTHON_REPL.to_string(),
            description: Some(
                "A Python shell. Use this to execute python commands. Input should be a valid \
                 python command. If you want to see the output of a value, you should print it \
                 out with `print(...)`."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "code": { "type": "string", "description": "Python code to run" }
                },
                "required": ["code"]
            }),
        }
    }

    /// Returns stdout (plus stderr when present). A non-zero exit status or a timeout is
    /// `ToolSourceError::Execution` carrying stderr.
    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError> {
        let code = sanitize_code(&string_arg(&args, "code")?);
        if code.is_empty() {
            return Err(ToolSourceError::InvalidInput("empty code".to_string()));
        }

        let child = tokio::process::Command::new(&self.python_bin)
            .arg("-c")
            .arg(&code)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| {
                ToolSourceError::Execution(format!(
                    "timed out after {}s",
                    self.timeout.as_secs_f32()
                ))
            })?
            .map_err(|e| {
                ToolSourceError::Execution(format!("failed to start {}: {}", self.python_bin, e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            let detail = if stderr.trim().is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(ToolSourceError::Execution(detail));
        }

        let text = if stderr.is_empty() {
            stdout
        } else if stdout.is_empty() {
            format!("stderr:\n{}", stderr)
        } else {
            format!("stdout:\n{}\nstderr:\n{}", stdout, stderr)
        };
        Ok(ToolCallContent { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_code_strips_fences() {
        assert_eq!(sanitize_code("```python\nprint(1)\n```"), "print(1)");
        assert_eq!(sanitize_code("```\nx = 2\n```"), "x = 2");
        assert_eq!(sanitize_code("  print(3)  "), "print(3)");
    }

    #[tokio::test]
    async fn blank_code_is_invalid_input() {
        let tool = PythonReplTool::default();
        let err = tool.call(json!({"code": "```\n```"})).await.unwrap_err();
        assert!(matches!(err, ToolSourceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn missing_interpreter_is_execution_error() {
        let tool = PythonReplTool::new("definitely-not-a-python-binary", DEFAULT_PYTHON_TIMEOUT);
        let err = tool.call(json!("print(1)")).await.unwrap_err();
        assert!(matches!(err, ToolSourceError::Execution(_)));
    }
}
