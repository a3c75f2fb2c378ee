//! ToolRegistry as a ToolSource, and the research registry built from config.

mod common;

use std::time::Duration;

use common::EchoTool;
use serde_json::json;
use synth::agent::research::{research_tool_registry, ResearchBuildConfig};
use synth::tools::{PythonReplTool, Tool};
use synth::{BuildRunnerError, ToolRegistry, ToolSource, ToolSourceError};

#[tokio::test]
async fn list_tools_is_sorted_by_name() {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(EchoTool { name: "zeta" }));
    registry.register(Box::new(EchoTool { name: "alpha" }));
    let names: Vec<String> = registry
        .list_tools()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[tokio::test]
async fn register_same_name_replaces() {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(EchoTool { name: "echo" }));
    registry.register(Box::new(EchoTool { name: "echo" }));
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn call_tool_dispatches_by_name() {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(EchoTool { name: "echo" }));
    let out = registry.call_tool("echo", json!("hello")).await.unwrap();
    assert_eq!(out.text, "echo: hello");
    let err = registry.call_tool("nope", json!({})).await.unwrap_err();
    assert!(matches!(err, ToolSourceError::NotFound(n) if n == "nope"));
}

#[test]
fn research_registry_has_the_six_tools() {
    let config = ResearchBuildConfig {
        openai_api_key: Some("sk-test".into()),
        tavily_api_key: Some("tvly-test".into()),
        ..Default::default()
    };
    let registry = research_tool_registry(&config).unwrap();
    assert_eq!(
        registry.names(),
        vec![
            "arxiv_search",
            "pubmed_search",
            "python_repl",
            "semantic_scholar_search",
            "tavily_search",
            "wikipedia_search",
        ]
    );
    for spec in registry.list() {
        assert!(spec.description.as_deref().is_some_and(|d| !d.is_empty()), "{}", spec.name);
        assert_eq!(spec.input_schema["type"], "object", "{}", spec.name);
    }
}

#[test]
fn research_registry_needs_tavily_key() {
    let config = ResearchBuildConfig::default();
    assert!(matches!(
        research_tool_registry(&config),
        Err(BuildRunnerError::MissingCredential("TAVILY_API_KEY"))
    ));
}

fn python_available() -> bool {
    std::process::Command::new("python3")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[tokio::test]
async fn python_repl_prints_result() {
    if !python_available() {
        eprintln!("python3 not found; skipping");
        return;
    }
    let tool = PythonReplTool::new("python3", Duration::from_secs(10));
    let out = tool
        .call(json!({"code": "```python\nprint(6 * 7)\n```"}))
        .await
        .unwrap();
    assert_eq!(out.text.trim(), "42");
}

#[tokio::test]
async fn python_repl_exception_is_execution_error() {
    if !python_available() {
        eprintln!("python3 not found; skipping");
        return;
    }
    let tool = PythonReplTool::new("python3", Duration::from_secs(10));
    let err = tool.call(json!("raise ValueError('bad input')")).await.unwrap_err();
    match err {
        ToolSourceError::Execution(msg) => assert!(msg.contains("ValueError"), "{}", msg),
        other => panic!("expected execution error, got {:?}", other),
    }
}

#[tokio::test]
async fn python_repl_times_out() {
    if !python_available() {
        eprintln!("python3 not found; skipping");
        return;
    }
    let tool = PythonReplTool::new("python3", Duration::from_millis(300));
    let err = tool
        .call(json!({"code": "import time\ntime.sleep(5)"}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("timed out"), "{}", err);
}
