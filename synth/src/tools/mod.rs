//! Research tools and the registry that exposes them as a `ToolSource`.
//!
//! Every search tool takes one `query` string (or a bare string argument) and returns plain
//! text for the model. Base URLs can be redirected through env vars, e.g. `ARXIV_API_URL`.

mod args;
mod arxiv;
mod pubmed;
mod python_repl;
mod registry;
mod semantic_scholar;
mod tavily;
mod r#trait;
mod wikipedia;

pub use args::string_arg;
pub use arxiv::{
    format_entries as format_arxiv_entries, looks_like_arxiv_id, parse_atom, ArxivEntry,
    ArxivSearchTool, TOOL_ARXIV_SEARCH,
};
pub use pubmed::{PubMedSearchTool, TOOL_PUBMED_SEARCH};
pub use python_repl::{
    sanitize_code, PythonReplTool, DEFAULT_PYTHON_BIN, DEFAULT_PYTHON_TIMEOUT, TOOL_PYTHON_REPL,
};
pub use r#trait::Tool;
pub use registry::ToolRegistry;
pub use semantic_scholar::{SemanticScholarSearchTool, TOOL_SEMANTIC_SCHOLAR_SEARCH};
pub use tavily::{TavilySearchTool, TOOL_TAVILY_SEARCH};
pub use wikipedia::{WikipediaSearchTool, TOOL_WIKIPEDIA_SEARCH};
