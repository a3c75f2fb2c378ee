//! `arxiv_search`: top papers from the arXiv Atom API.

use std::sync::OnceLock;

use async_trait::async_trait;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;
use regex::Regex;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::args::{
    base_url_from_env, http_client, send_text, single_string_schema, squash_whitespace,
    string_arg, truncate_chars, MAX_SUMMARY_CHARS,
};
use crate::tools::Tool;

pub const TOOL_ARXIV_SEARCH: &str = "arxiv_search";

const DEFAULT_BASE_URL: &str = "http://export.arxiv.org";
const MAX_RESULTS: usize = 5;
pub(crate) const NO_RESULT: &str = "No good Arxiv Result was found";

/// One parsed Atom `<entry>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArxivEntry {
    pub title: String,
    pub authors: Vec<String>,
    pub published: String,
    pub summary: String,
    pub link: String,
}

pub struct ArxivSearchTool {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ArxivSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ArxivSearchTool {
    /// Uses `ARXIV_API_URL` when set, else the public export endpoint.
    pub fn new() -> Self {
        Self::with_base_url(base_url_from_env("ARXIV_API_URL", DEFAULT_BASE_URL))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

fn id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4}\.\d{4,5}|[a-z\-]+(\.[A-Z]{2})?/\d{7})(v\d+)?$").expect("valid regex")
    })
}

/// True when the query is an arXiv identifier like `2303.08774` or `hep-th/9901001v2`.
pub fn looks_like_arxiv_id(query: &str) -> bool {
    id_pattern().is_match(query.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Summary,
    Published,
    Id,
    AuthorName,
}

impl Field {
    fn from_tag(local_name: &[u8], in_author: bool) -> Option<Self> {
        match local_name {
            b"title" => Some(Self::Title),
            b"summary" => Some(Self::Summary),
            b"published" => Some(Self::Published),
            b"id" => Some(Self::Id),
            b"name" if in_author => Some(Self::AuthorName),
            _ => None,
        }
    }
}

#[derive(Default)]
struct EntryBuilder {
    title: String,
    authors: Vec<String>,
    published: String,
    summary: String,
    link: String,
}

impl EntryBuilder {
    fn set(&mut self, field: Field, text: &str) {
        match field {
            Field::Title => self.title = squash_whitespace(text),
            Field::Summary => self.summary = squash_whitespace(text),
            Field::Published => self.published = text.trim().chars().take(10).collect(),
            Field::Id => self.link = text.trim().to_string(),
            Field::AuthorName => self.authors.push(squash_whitespace(text)),
        }
    }

    fn finish(self) -> Option<ArxivEntry> {
        // arXiv reports query errors as an entry titled "Error".
        if self.title.is_empty() || self.title == "Error" {
            return None;
        }
        Some(ArxivEntry {
            title: self.title,
            authors: self.authors,
            published: self.published,
            summary: self.summary,
            link: self.link,
        })
    }
}

/// Text of a `&...;` reference: character references and the five predefined entities.
/// Anything else is kept as written.
fn resolve_reference(reference: &BytesRef<'_>) -> String {
    if let Ok(Some(ch)) = reference.resolve_char_ref() {
        return ch.to_string();
    }
    let name = String::from_utf8_lossy(reference);
    match resolve_predefined_entity(&name) {
        Some(text) => text.to_string(),
        None => format!("&{};", name),
    }
}

/// Parses the entries of an arXiv Atom feed. Entries without a title are skipped; a
/// malformed feed yields the entries read before the error.
pub fn parse_atom(feed: &str) -> Vec<ArxivEntry> {
    let mut reader = Reader::from_str(feed);
    let mut entries = Vec::new();
    let mut entry: Option<EntryBuilder> = None;
    let mut in_author = false;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"entry" => entry = Some(EntryBuilder::default()),
                b"author" => in_author = true,
                name if entry.is_some() => {
                    field = Field::from_tag(name, in_author);
                    text.clear();
                }
                _ => {}
            },
            Ok(Event::Text(t)) if field.is_some() => match t.decode() {
                Ok(s) => text.push_str(&s),
                Err(_) => text.push_str(&String::from_utf8_lossy(&t)),
            },
            Ok(Event::CData(c)) if field.is_some() => text.push_str(&String::from_utf8_lossy(&c)),
            Ok(Event::GeneralRef(r)) if field.is_some() => text.push_str(&resolve_reference(&r)),
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"entry" => {
                    if let Some(built) = entry.take().and_then(EntryBuilder::finish) {
                        entries.push(built);
                    }
                    in_author = false;
                }
                b"author" => in_author = false,
                name => {
                    if let (Some(open), Some(current)) = (field, entry.as_mut()) {
                        if Field::from_tag(name, in_author) == Some(open) {
                            current.set(open, &text);
                            field = None;
                        }
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!(error = %e, "malformed arXiv feed");
                break;
            }
            _ => {}
        }
    }
    entries
}

/// Renders entries as the tool result text.
pub fn format_entries(entries: &[ArxivEntry]) -> String {
    if entries.is_empty() {
        return NO_RESULT.to_string();
    }
    entries
        .iter()
        .map(|e| {
            format!(
                "Published: {}\nTitle: {}\nAuthors: {}\nLink: {}\nSummary: {}",
                e.published,
                e.title,
                e.authors.join(", "),
                e.link,
                truncate_chars(&e.summary, MAX_SUMMARY_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl Tool for ArxivSearchTool {
    fn name(&self) -> &str {
        TOOL_ARXIV_SEARCH
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_ARXIV_SEARCH.to_string(),
            description: Some(
                "Searches Arxiv.org for academic papers. Input a topic or paper ID.".to_string(),
            ),
            input_schema: single_string_schema("query", "Search topic or arXiv paper ID"),
        }
    }

    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError> {
        let query = string_arg(&args, "query")?;
        let url = format!("{}/api/query", self.base_url);
        let max = MAX_RESULTS.to_string();
        let request = if looks_like_arxiv_id(&query) {
            self.client
                .get(url)
                .query(&[("id_list", query.as_str()), ("max_results", max.as_str())])
        } else {
            let search = format!("all:{}", query);
            self.client.get(url).query(&[
                ("search_query", search.as_str()),
                ("start", "0"),
                ("max_results", max.as_str()),
            ])
        };
        let feed = send_text(request).await?;
        let entries = parse_atom(&feed);
        tracing::debug!(query = %query, results = entries.len(), "arxiv search");
        Ok(ToolCallContent {
            text: format_entries(&entries),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/abs/2401.00001v1</id>
    <published>2024-01-02T18:00:00Z</published>
    <title>Prime Editing
      in Human Cells</title>
    <summary>  We report &amp; evaluate
 prime editors.  </summary>
    <author><name>Jane Doe</name></author>
    <author>
      <name>John Roe</name>
    </author>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2401.00002v1</id>
    <published>2024-01-03T00:00:00Z</published>
    <title>Base Editing Review</title>
    <summary>A review.</summary>
    <author><name>A. Author</name></author>
  </entry>
</feed>"#;

    #[test]
    fn parse_atom_reads_all_fields() {
        let entries = parse_atom(FEED);
        assert_eq!(entries.len(), 2);
        let first = &entries[0];
        assert_eq!(first.title, "Prime Editing in Human Cells");
        assert_eq!(first.authors, vec!["Jane Doe", "John Roe"]);
        assert_eq!(first.published, "2024-01-02");
        assert_eq!(first.summary, "We report & evaluate prime editors.");
        assert_eq!(first.link, "http://arxiv.org/abs/2401.00001v1");
    }

    #[test]
    fn parse_atom_decodes_references_and_cdata() {
        let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query: search_query=all:helix</title>
  <entry>
    <id>http://arxiv.org/abs/2402.00003v1</id>
    <published>2024-02-01T00:00:00Z</published>
    <title>Caf&#233; &#x3B1;-helix &amp; friends</title>
    <summary><![CDATA[A <b>bold</b> claim]]></summary>
    <author><name>A. B&#252;rger</name></author>
  </entry>
</feed>"#;
        let entries = parse_atom(feed);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Café α-helix & friends");
        assert_eq!(entries[0].summary, "A <b>bold</b> claim");
        assert_eq!(entries[0].authors, vec!["A. Bürger"]);
    }

    #[test]
    fn feed_title_and_error_entries_are_not_papers() {
        let feed = r#"<feed><title>ArXiv Query</title><id>feed-id</id>
  <entry><id>http://arxiv.org/api/errors</id><title>Error</title><summary>bad query</summary></entry>
</feed>"#;
        assert!(parse_atom(feed).is_empty());
    }

    #[test]
    fn malformed_feed_keeps_entries_read_so_far() {
        let feed = r#"<feed><entry><title>First</title></entry><entry><title>Second</broken></feed>"#;
        let entries = parse_atom(feed);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "First");
    }

    #[test]
    fn format_entries_lists_papers_or_reports_none() {
        let text = format_entries(&parse_atom(FEED));
        assert!(text.starts_with("Published: 2024-01-02\nTitle: Prime Editing in Human Cells"));
        assert!(text.contains("Authors: A. Author"));
        assert_eq!(format_entries(&[]), NO_RESULT);
    }

    #[test]
    fn arxiv_ids_are_detected() {
        assert!(looks_like_arxiv_id("2303.08774"));
        assert!(looks_like_arxiv_id("2303.08774v2"));
        assert!(looks_like_arxiv_id("hep-th/9901001"));
        assert!(!looks_like_arxiv_id("CRISPR base editing"));
    }
}
