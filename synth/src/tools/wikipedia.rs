//! `wikipedia_search`: intro extracts of the best-matching Wikipedia pages.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::args::{
    base_url_from_env, http_client, send_json, single_string_schema, string_arg, truncate_chars,
    MAX_SUMMARY_CHARS,
};
use crate::tools::Tool;

pub const TOOL_WIKIPEDIA_SEARCH: &str = "wikipedia_search";

const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";
const MAX_RESULTS: usize = 2;

#[derive(Debug, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub query: Option<QueryPages>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryPages {
    #[serde(default)]
    pub pages: HashMap<String, Page>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub title: String,
    #[serde(default)]
    pub extract: String,
    /// Search rank; lower is better.
    #[serde(default)]
    pub index: u32,
}

/// Renders pages in search-rank order.
pub fn format_pages(response: QueryResponse) -> String {
    let mut pages: Vec<Page> = response
        .query
        .map(|q| q.pages.into_values().collect())
        .unwrap_or_default();
    if pages.is_empty() {
        return "No good Wikipedia Search Result was found".to_string();
    }
    pages.sort_by_key(|p| p.index);
    pages
        .iter()
        .map(|p| {
            format!(
                "Page: {}\nSummary: {}",
                p.title,
                truncate_chars(p.extract.trim(), MAX_SUMMARY_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub struct WikipediaSearchTool {
    client: reqwest::Client,
    base_url: String,
}

impl Default for WikipediaSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WikipediaSearchTool {
    /// Uses `WIKIPEDIA_API_URL` when set, else English Wikipedia.
    pub fn new() -> Self {
        Self::with_base_url(base_url_from_env("WIKIPEDIA_API_URL", DEFAULT_BASE_URL))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Tool for WikipediaSearchTool {
    fn name(&self) -> &str {
        TOOL_WIKIPEDIA_SEARCH
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_WIKIPEDIA_SEARCH.to_string(),
            description: Some(
                "Looks up scientific info on Wikipedia for background knowledge.".to_string(),
            ),
            input_schema: single_string_schema("query", "Topic to look up"),
        }
    }

    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError> {
        let query = string_arg(&args, "query")?;
        let limit = MAX_RESULTS.to_string();
        let request = self
            .client
            .get(format!("{}/w/api.php", self.base_url))
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("generator", "search"),
                ("gsrsearch", query.as_str()),
                ("gsrlimit", limit.as_str()),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
            ]);
        let body: QueryResponse = send_json(request).await?;
        Ok(ToolCallContent {
            text: format_pages(body),
        })
    }
}
