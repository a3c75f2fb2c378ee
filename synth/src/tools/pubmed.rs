//! `pubmed_search`: biomedical literature through NCBI E-utilities (esearch + esummary).

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::args::{base_url_from_env, http_client, send_json, single_string_schema, string_arg};
use crate::tools::Tool;

pub const TOOL_PUBMED_SEARCH: &str = "pubmed_search";

const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const MAX_RESULTS: usize = 3;
const NO_RESULT: &str = "No good PubMed Result was found";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    esearchresult: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub result: HashMap<String, Value>,
}

/// One PubMed record from esummary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fulljournalname: String,
    #[serde(default)]
    pub pubdate: String,
}

/// Records in the order of `ids`; ids missing from the summary are skipped.
pub fn records_in_order(summary: &SummaryResponse, ids: &[String]) -> Vec<Record> {
    ids.iter()
        .filter_map(|id| summary.result.get(id))
        .filter_map(|v| serde_json::from_value::<Record>(v.clone()).ok())
        .collect()
}

pub fn format_records(records: &[Record]) -> String {
    if records.is_empty() {
        return NO_RESULT.to_string();
    }
    records
        .iter()
        .map(|r| {
            format!(
                "Published: {}\nTitle: {}\nJournal: {}\nPMID: {}",
                r.pubdate, r.title, r.fulljournalname, r.uid
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub struct PubMedSearchTool {
    client: reqwest::Client,
    base_url: String,
}

impl Default for PubMedSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl PubMedSearchTool {
    /// Uses `PUBMED_API_URL` when set.
    pub fn new() -> Self {
        Self::with_base_url(base_url_from_env("PUBMED_API_URL", DEFAULT_BASE_URL))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Tool for PubMedSearchTool {
    fn name(&self) -> &str {
        TOOL_PUBMED_SEARCH
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_PUBMED_SEARCH.to_string(),
            description: Some(
                "A tool for searching the PubMed database for biomedical literature and extracting information."
                    .to_string(),
            ),
            input_schema: single_string_schema("query", "PubMed search terms"),
        }
    }

    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError> {
        let query = string_arg(&args, "query")?;
        let retmax = MAX_RESULTS.to_string();
        let search: SearchResponse = send_json(
            self.client
                .get(format!("{}/esearch.fcgi", self.base_url))
                .query(&[
                    ("db", "pubmed"),
                    ("term", query.as_str()),
                    ("retmax", retmax.as_str()),
                    ("retmode", "json"),
                ]),
        )
        .await?;
        let ids = search.esearchresult.idlist;
        if ids.is_empty() {
            return Ok(ToolCallContent {
                text: NO_RESULT.to_string(),
            });
        }

        let id_param = ids.join(",");
        let summary: SummaryResponse = send_json(
            self.client
                .get(format!("{}/esummary.fcgi", self.base_url))
                .query(&[
                    ("db", "pubmed"),
                    ("id", id_param.as_str()),
                    ("retmode", "json"),
                ]),
        )
        .await?;
        let records = records_in_order(&summary, &ids);
        tracing::debug!(query = %query, results = records.len(), "pubmed search");
        Ok(ToolCallContent {
            text: format_records(&records),
        })
    }
}
