//! `tavily_search`: real-time web search through the Tavily API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::args::{
    base_url_from_env, http_client, send_json, single_string_schema, string_arg, truncate_chars,
    MAX_SUMMARY_CHARS,
};
use crate::tools::Tool;

pub const TOOL_TAVILY_SEARCH: &str = "tavily_search";

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";
const MAX_RESULTS: u32 = 5;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No web results found".to_string();
    }
    results
        .iter()
        .map(|r| {
            format!(
                "Title: {}\nURL: {}\nContent: {}",
                r.title,
                r.url,
                truncate_chars(r.content.trim(), MAX_SUMMARY_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub struct TavilySearchTool {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TavilySearchTool {
    /// Uses `TAVILY_API_URL` when set.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(
            api_key,
            base_url_from_env("TAVILY_API_URL", DEFAULT_BASE_URL),
        )
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Tool for TavilySearchTool {
    fn name(&self) -> &str {
        TOOL_TAVILY_SEARCH
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_TAVILY_SEARCH.to_string(),
            description: Some(
                "Performs a real-time web search for the latest scientific news and blog summaries."
                    .to_string(),
            ),
            input_schema: single_string_schema("query", "Web search query"),
        }
    }

    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError> {
        let query = string_arg(&args, "query")?;
        let request = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&SearchRequest {
                api_key: &self.api_key,
                query: &query,
                max_results: MAX_RESULTS,
            });
        let body: SearchResponse = send_json(request).await?;
        tracing::debug!(query = %query, results = body.results.len(), "tavily search");
        Ok(ToolCallContent {
            text: format_results(&body.results),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_results_lists_title_url_and_content() {
        let body: SearchResponse = serde_json::from_value(serde_json::json!({
            "query": "CRISPR trials",
            "results": [
                {"title": "Trial news", "url": "https://example.org/a", "content": " Phase 1 started. ", "score": 0.9}
            ]
        }))
        .unwrap();
        assert_eq!(
            format_results(&body.results),
            "Title: Trial news\nURL: https://example.org/a\nContent: Phase 1 started."
        );
        assert_eq!(format_results(&[]), "No web results found");
    }

    #[test]
    fn request_body_carries_api_key() {
        let body = serde_json::to_value(SearchRequest {
            api_key: "tvly-test",
            query: "q",
            max_results: MAX_RESULTS,
        })
        .unwrap();
        assert_eq!(body["api_key"], "tvly-test");
        assert_eq!(body["max_results"], 5);
    }
}
