//! # Synth
//!
//! A scientific research assistant built on a small graph-based agent core. One shared
//! state type ([`ConversationState`]) flows through the nodes of a [`StateGraph`]; each node
//! receives the state, appends turns and hands it on.
//!
//! ## The research loop
//!
//! Each interaction appends the user's question and runs
//! **reason → act → reason → … → grade → stop or continue**:
//!
//! - **reason** ([`ReasonNode`]): the model sees the research prompt, the transcript and the
//!   tool specs; it answers or requests tool calls.
//! - **act** ([`ActNode`]): every requested tool runs; results (or error text) are appended.
//! - **grade** ([`GradeNode`]): the model judges whether the last turn fully answers the
//!   question.
//!
//! [`TurnRouter`] decides each transition from the transcript alone; a turn limit guarantees
//! termination. [`extract_answer`] turns the finished transcript into an [`Answer`].
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`].
//! - [`agent`]: [`agent::research`], with the nodes, routing rules, [`ResearchRunner`] and
//!   [`build_research_runner`].
//! - [`state`]: [`ConversationState`], [`Turn`], [`ToolCall`].
//! - [`llm`]: [`LlmClient`], [`MockLlm`], [`ChatOpenAI`].
//! - [`memory`]: [`Checkpointer`], [`MemorySaver`], [`SqliteSaver`].
//! - [`tool_source`] and [`tools`]: [`ToolSource`], [`ToolRegistry`] and the research tools.
//! - [`answer`]: [`extract_answer`], [`Answer`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use synth::{MockLlm, ResearchRunner, ResearchRunnerOptions, ToolRegistry};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockLlm::new()
//!     .then_reply("Final answer: plants turn light into chemical energy.")
//!     .then_reply("YES");
//! let runner = ResearchRunner::new(
//!     Arc::new(llm),
//!     Arc::new(ToolRegistry::new()),
//!     ResearchRunnerOptions::default(),
//! )
//! .await?;
//! let outcome = runner.ask("How does photosynthesis work?", None).await?;
//! println!("{}", outcome.answer);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod answer;
pub mod error;
pub mod graph;
pub mod llm;
pub mod memory;
pub mod message;
pub mod state;
pub mod tool_source;
pub mod tools;

pub use agent::research::{
    build_research_runner, build_research_runner_with_llm, ActNode, AskOutcome,
    BuildRunnerError, GradeNode, KeywordVerdict, ReasonNode, ResearchBuildConfig,
    ResearchRunner, ResearchRunnerOptions, RoutingConfig, RoutingDecision, RunError,
    TurnRouter, VerdictPolicy, RESEARCH_SYSTEM_PROMPT,
};
pub use answer::{extract_answer, Answer, ANSWER_HEADER, NO_ANSWER_MESSAGE};
pub use error::AgentError;
pub use graph::{
    CompilationError, CompiledStateGraph, Next, Node, StateGraph, DEFAULT_RECURSION_LIMIT, END,
    START,
};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm, ToolChoiceMode};
pub use memory::{
    Checkpoint, CheckpointError, Checkpointer, JsonSerializer, MemorySaver, RunnableConfig,
    SqliteSaver,
};
pub use message::Message;
pub use state::{new_session_id, ConversationState, Role, ToolCall, Turn};
pub use tool_source::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
pub use tools::{Tool, ToolRegistry};
