//! Shared helpers for the research tools: argument extraction, text shaping and HTTP.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::tool_source::ToolSourceError;

/// Longest summary/abstract kept per result, in characters.
pub(crate) const MAX_SUMMARY_CHARS: usize = 4000;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Reads a string argument: a bare string, `{field: "..."}`, or an object whose only
/// value is a string.
pub fn string_arg(args: &Value, field: &str) -> Result<String, ToolSourceError> {
    let value = match args {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get(field).and_then(Value::as_str).or_else(|| {
            let mut strings = map.values().filter_map(Value::as_str);
            match (strings.next(), strings.next()) {
                (Some(only), None) => Some(only),
                _ => None,
            }
        }),
        _ => None,
    };
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        Some(_) => Err(ToolSourceError::InvalidInput(format!("empty {}", field))),
        None => Err(ToolSourceError::InvalidInput(format!("missing {}", field))),
    }
}

/// JSON schema for a tool taking one required string field.
pub(crate) fn single_string_schema(field: &str, description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            field: { "type": "string", "description": description }
        },
        "required": [field]
    })
}

/// Collapses runs of whitespace to single spaces.
pub(crate) fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `s` to at most `max` characters, on a char boundary.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// `$var` when set and non-empty (without a trailing slash), else `default`.
pub(crate) fn base_url_from_env(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!("synth/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Sends the request; non-2xx statuses are transport errors.
pub(crate) async fn send_ok(
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, ToolSourceError> {
    let response = request
        .send()
        .await
        .map_err(|e| ToolSourceError::Transport(format!("request failed: {}", e)))?;
    if !response.status().is_success() {
        return Err(ToolSourceError::Transport(format!(
            "request failed with status: {}",
            response.status()
        )));
    }
    Ok(response)
}

pub(crate) async fn send_text(request: reqwest::RequestBuilder) -> Result<String, ToolSourceError> {
    send_ok(request)
        .await?
        .text()
        .await
        .map_err(|e| ToolSourceError::Transport(format!("failed to read response: {}", e)))
}

pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, ToolSourceError> {
    send_ok(request)
        .await?
        .json::<T>()
        .await
        .map_err(|e| ToolSourceError::Transport(format!("invalid response body: {}", e)))
}
