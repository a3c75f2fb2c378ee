//! `semantic_scholar_search`: papers and citation counts from the Semantic Scholar Graph API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::args::{
    base_url_from_env, http_client, send_json, single_string_schema, string_arg, truncate_chars,
    MAX_SUMMARY_CHARS,
};
use crate::tools::Tool;

pub const TOOL_SEMANTIC_SCHOLAR_SEARCH: &str = "semantic_scholar_search";

const DEFAULT_BASE_URL: &str = "https://api.semanticscholar.org";
const MAX_RESULTS: usize = 5;
const FIELDS: &str = "title,abstract,year,authors,citationCount,url";

#[derive(Debug, Deserialize)]
pub struct PaperSearchResponse {
    #[serde(default)]
    pub data: Vec<Paper>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub citation_count: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: Option<String>,
}

pub fn format_papers(papers: &[Paper]) -> String {
    if papers.is_empty() {
        return "No Semantic Scholar results found".to_string();
    }
    papers
        .iter()
        .map(|p| {
            let authors = p
                .authors
                .iter()
                .filter_map(|a| a.name.as_deref())
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Published year: {}\nTitle: {}\nAuthors: {}\nCitations: {}\nURL: {}\nAbstract: {}",
                p.year.map_or_else(|| "unknown".to_string(), |y| y.to_string()),
                p.title.as_deref().unwrap_or("(untitled)"),
                authors,
                p.citation_count.unwrap_or(0),
                p.url.as_deref().unwrap_or(""),
                truncate_chars(p.abstract_text.as_deref().unwrap_or(""), MAX_SUMMARY_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub struct SemanticScholarSearchTool {
    client: reqwest::Client,
    base_url: String,
}

impl Default for SemanticScholarSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticScholarSearchTool {
    /// Uses `SEMANTIC_SCHOLAR_API_URL` when set.
    pub fn new() -> Self {
        Self::with_base_url(base_url_from_env(
            "SEMANTIC_SCHOLAR_API_URL",
            DEFAULT_BASE_URL,
        ))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Tool for SemanticScholarSearchTool {
    fn name(&self) -> &str {
        TOOL_SEMANTIC_SCHOLAR_SEARCH
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_SEMANTIC_SCHOLAR_SEARCH.to_string(),
            description: Some(
                "Finds research papers and citation info using Semantic Scholar.".to_string(),
            ),
            input_schema: single_string_schema("query", "Search query for research papers"),
        }
    }

    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError> {
        let query = string_arg(&args, "query")?;
        let limit = MAX_RESULTS.to_string();
        let request = self
            .client
            .get(format!("{}/graph/v1/paper/search", self.base_url))
            .query(&[
                ("query", query.as_str()),
                ("limit", limit.as_str()),
                ("fields", FIELDS),
            ]);
        let body: PaperSearchResponse = send_json(request).await?;
        tracing::debug!(query = %query, results = body.data.len(), "semantic scholar search");
        Ok(ToolCallContent {
            text: format_papers(&body.data),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_papers_includes_citations_and_handles_missing_fields() {
        let body: PaperSearchResponse = serde_json::from_value(serde_json::json!({
            "total": 2,
            "data": [
                {
                    "title": "Search-and-replace genome editing",
                    "abstract": "Prime editing ...",
                    "year": 2019,
                    "authors": [{"name": "A. Anzalone"}, {"name": "D. Liu"}],
                    "citationCount": 4200,
                    "url": "https://www.semanticscholar.org/paper/x"
                },
                { "title": "No abstract paper", "abstract": null, "authors": [] }
            ]
        }))
        .unwrap();
        let text = format_papers(&body.data);
        assert!(text.contains("Published year: 2019"));
        assert!(text.contains("Authors: A. Anzalone, D. Liu"));
        assert!(text.contains("Citations: 4200"));
        assert!(text.contains("Published year: unknown\nTitle: No abstract paper"));
    }

    #[test]
    fn empty_search_reports_no_results() {
        assert_eq!(format_papers(&[]), "No Semantic Scholar results found");
    }
}
