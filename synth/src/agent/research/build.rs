//! Builds a production `ResearchRunner` from environment configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_openai::config::OpenAIConfig;

use crate::llm::{ChatOpenAI, LlmClient, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::memory::{CheckpointError, Checkpointer, JsonSerializer, MemorySaver, SqliteSaver};
use crate::state::ConversationState;
use crate::tools::{
    ArxivSearchTool, PubMedSearchTool, PythonReplTool, SemanticScholarSearchTool,
    TavilySearchTool, ToolRegistry, WikipediaSearchTool, DEFAULT_PYTHON_BIN,
    DEFAULT_PYTHON_TIMEOUT,
};

use super::routing::{RoutingConfig, DEFAULT_MAX_TURNS};
use super::runner::{ResearchRunner, ResearchRunnerOptions, RunError};

#[derive(Debug, thiserror::Error)]
pub enum BuildRunnerError {
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),
    #[error("invalid setting {name}={value}")]
    InvalidSetting { name: &'static str, value: String },
    #[error("checkpointer: {0}")]
    Checkpoint(#[from] CheckpointError),
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Settings read once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct ResearchBuildConfig {
    pub openai_api_key: Option<String>,
    /// API base including `/v1`, e.g. `http://localhost:8000/v1`.
    pub openai_base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub tavily_api_key: Option<String>,
    pub max_turns: usize,
    /// SQLite file for sessions; `None` keeps them in memory.
    pub db_path: Option<PathBuf>,
    pub python_bin: String,
    pub python_timeout: Duration,
}

impl Default for ResearchBuildConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            tavily_api_key: None,
            max_turns: DEFAULT_MAX_TURNS,
            db_path: None,
            python_bin: DEFAULT_PYTHON_BIN.to_string(),
            python_timeout: DEFAULT_PYTHON_TIMEOUT,
        }
    }
}

fn parse_setting<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, BuildRunnerError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| BuildRunnerError::InvalidSetting { name, value: v }),
    }
}

impl ResearchBuildConfig {
    /// Reads the process environment. Call after `config::load_and_apply`.
    pub fn from_env() -> Result<Self, BuildRunnerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with a custom variable lookup. Empty values count as unset.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, BuildRunnerError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL"),
            model: get("OPENAI_MODEL").unwrap_or(defaults.model),
            temperature: parse_setting(
                "SYNTH_TEMPERATURE",
                get("SYNTH_TEMPERATURE"),
                defaults.temperature,
            )?,
            tavily_api_key: get("TAVILY_API_KEY"),
            max_turns: parse_setting("SYNTH_MAX_TURNS", get("SYNTH_MAX_TURNS"), defaults.max_turns)?,
            db_path: get("SYNTH_DB").map(PathBuf::from),
            python_bin: get("PYTHON_BIN").unwrap_or(defaults.python_bin),
            python_timeout: Duration::from_secs(parse_setting(
                "SYNTH_PYTHON_TIMEOUT_SECS",
                get("SYNTH_PYTHON_TIMEOUT_SECS"),
                defaults.python_timeout.as_secs(),
            )?),
        })
    }

    /// Fails on the first missing required key.
    pub fn require_credentials(&self) -> Result<(), BuildRunnerError> {
        if self.openai_api_key.is_none() {
            return Err(BuildRunnerError::MissingCredential("OPENAI_API_KEY"));
        }
        if self.tavily_api_key.is_none() {
            return Err(BuildRunnerError::MissingCredential("TAVILY_API_KEY"));
        }
        Ok(())
    }
}

/// The six research tools.
pub fn research_tool_registry(
    config: &ResearchBuildConfig,
) -> Result<ToolRegistry, BuildRunnerError> {
    let tavily_key = config
        .tavily_api_key
        .as_deref()
        .ok_or(BuildRunnerError::MissingCredential("TAVILY_API_KEY"))?;
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(ArxivSearchTool::new()));
    registry.register(Box::new(SemanticScholarSearchTool::new()));
    registry.register(Box::new(WikipediaSearchTool::new()));
    registry.register(Box::new(TavilySearchTool::new(tavily_key)));
    registry.register(Box::new(PubMedSearchTool::new()));
    registry.register(Box::new(PythonReplTool::new(
        config.python_bin.clone(),
        config.python_timeout,
    )));
    Ok(registry)
}

pub fn build_llm(config: &ResearchBuildConfig) -> Result<ChatOpenAI, BuildRunnerError> {
    let api_key = config
        .openai_api_key
        .as_deref()
        .ok_or(BuildRunnerError::MissingCredential("OPENAI_API_KEY"))?;
    let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(ref base) = config.openai_base_url {
        openai_config = openai_config.with_api_base(base.trim_end_matches('/'));
    }
    Ok(ChatOpenAI::with_config(openai_config, config.model.clone())
        .with_temperature(config.temperature))
}

pub fn build_checkpointer(
    config: &ResearchBuildConfig,
) -> Result<Arc<dyn Checkpointer<ConversationState>>, BuildRunnerError> {
    let checkpointer: Arc<dyn Checkpointer<ConversationState>> = match &config.db_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "using SQLite session store");
            let serializer = Arc::new(JsonSerializer::<ConversationState>::new());
            Arc::new(SqliteSaver::new(path, serializer)?)
        }
        None => Arc::new(MemorySaver::<ConversationState>::new()),
    };
    Ok(checkpointer)
}

/// Runner backed by OpenAI, the research tools and the configured session store.
pub async fn build_research_runner(
    config: &ResearchBuildConfig,
) -> Result<ResearchRunner, BuildRunnerError> {
    config.require_credentials()?;
    let llm: Arc<dyn LlmClient> = Arc::new(build_llm(config)?);
    build_research_runner_with_llm(config, llm).await
}

/// Same as `build_research_runner` with a caller-supplied model client.
pub async fn build_research_runner_with_llm(
    config: &ResearchBuildConfig,
    llm: Arc<dyn LlmClient>,
) -> Result<ResearchRunner, BuildRunnerError> {
    let tools = Arc::new(research_tool_registry(config)?);
    let options = ResearchRunnerOptions {
        routing: RoutingConfig::default().with_max_turns(config.max_turns),
        checkpointer: Some(build_checkpointer(config)?),
        ..ResearchRunnerOptions::default()
    };
    Ok(ResearchRunner::new(llm, tools, options).await?)
}
