//! Research assistant: reason → act → reason → grade → stop or continue.
//!
//! ```text
//! START → reason ─┬─(tool calls)──→ act ──→ reason
//!                 └─(answer/guard)→ grade ─┬─(verdict/guard)→ END
//!                                          └─(otherwise)────→ reason
//! ```
//!
//! [`ResearchRunner`] wires the three nodes with [`TurnRouter`] and a checkpointer;
//! [`build_research_runner`] assembles the production stack from environment settings.

mod act_node;
mod build;
mod grade_node;
mod prompt;
mod reason_node;
mod routing;
mod runner;

pub use act_node::{parse_tool_arguments, render_tool_error, ActNode, DEFAULT_TOOL_ERROR_TEMPLATE};
pub use build::{
    build_checkpointer, build_llm, build_research_runner, build_research_runner_with_llm,
    research_tool_registry, BuildRunnerError, ResearchBuildConfig,
};
pub use grade_node::GradeNode;
pub use prompt::{grader_prompt, RESEARCH_SYSTEM_PROMPT};
pub use reason_node::{build_messages, ReasonNode};
pub use routing::{
    KeywordVerdict, RoutingConfig, RoutingDecision, TurnRouter, VerdictPolicy,
    DEFAULT_FINAL_MARKERS, DEFAULT_GIVE_UP_PHRASES, DEFAULT_MAX_TURNS, DEFAULT_STOP_KEYWORDS,
    NODE_ACT, NODE_GRADE, NODE_REASON,
};
pub use runner::{AskOutcome, ResearchRunner, ResearchRunnerOptions, RunError};
