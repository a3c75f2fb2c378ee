//! Research runner: builds the reason / act / grade graph and drives one interaction.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::answer::{extract_answer, Answer};
use crate::error::AgentError;
use crate::graph::{
    CompilationError, CompiledStateGraph, StateGraph, DEFAULT_RECURSION_LIMIT, END, START,
};
use crate::llm::LlmClient;
use crate::memory::{CheckpointError, Checkpointer, MemorySaver, RunnableConfig};
use crate::state::{new_session_id, ConversationState, Turn};
use crate::tool_source::{ToolSource, ToolSourceError, ToolSpec};

use super::act_node::{ActNode, DEFAULT_TOOL_ERROR_TEMPLATE};
use super::grade_node::GradeNode;
use super::prompt::RESEARCH_SYSTEM_PROMPT;
use super::reason_node::ReasonNode;
use super::routing::{RoutingConfig, TurnRouter, VerdictPolicy, NODE_ACT, NODE_GRADE, NODE_REASON};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("question is empty")]
    EmptyQuestion,
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
    #[error("listing tools failed: {0}")]
    Tools(#[from] ToolSourceError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Optional knobs for [`ResearchRunner::new`].
#[derive(Clone)]
pub struct ResearchRunnerOptions {
    pub system_prompt: String,
    pub routing: RoutingConfig,
    /// Replaces the keyword verdict built from `routing`.
    pub verdict: Option<Arc<dyn VerdictPolicy>>,
    /// Session store; `None` uses a fresh `MemorySaver`.
    pub checkpointer: Option<Arc<dyn Checkpointer<ConversationState>>>,
    pub tool_error_template: String,
    /// Node executions allowed per interaction; a model that never stops calling tools
    /// fails with `AgentError::RecursionLimit`.
    pub recursion_limit: usize,
}

impl Default for ResearchRunnerOptions {
    fn default() -> Self {
        Self {
            system_prompt: RESEARCH_SYSTEM_PROMPT.to_string(),
            routing: RoutingConfig::default(),
            verdict: None,
            checkpointer: None,
            tool_error_template: DEFAULT_TOOL_ERROR_TEMPLATE.to_string(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

/// Outcome of [`ResearchRunner::ask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskOutcome {
    pub session_id: String,
    pub answer: Answer,
    /// Turns in the session after this interaction.
    pub turn_count: usize,
}

/// Owns the compiled research graph and the session store.
///
/// One `invoke` is one interaction: load the session, append the question, run the loop to
/// `Done`, save once. Calls for the same session id are serialized.
pub struct ResearchRunner {
    compiled: CompiledStateGraph<ConversationState>,
    checkpointer: Arc<dyn Checkpointer<ConversationState>>,
    tool_specs: Vec<ToolSpec>,
    recursion_limit: usize,
    /// Entries exist only while a run for the session is in flight or waiting.
    session_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ResearchRunner {
    pub async fn new(
        llm: Arc<dyn LlmClient>,
        tools: Arc<dyn ToolSource>,
        options: ResearchRunnerOptions,
    ) -> Result<Self, RunError> {
        let tool_specs = tools.list_tools().await?;
        let router = match options.verdict {
            Some(v) => TurnRouter::with_verdict(options.routing, v),
            None => TurnRouter::new(options.routing),
        };
        let checkpointer = options.checkpointer.unwrap_or_else(|| {
            Arc::new(MemorySaver::<ConversationState>::new())
                as Arc<dyn Checkpointer<ConversationState>>
        });

        let reason = ReasonNode::new(
            Arc::clone(&llm),
            tool_specs.clone(),
            options.system_prompt,
        );
        let act = ActNode::new(tools).with_error_template(options.tool_error_template);
        let grade = GradeNode::new(llm);

        let reason_map: HashMap<String, String> = [
            (NODE_ACT.to_string(), NODE_ACT.to_string()),
            (NODE_GRADE.to_string(), NODE_GRADE.to_string()),
        ]
        .into_iter()
        .collect();
        let grade_map: HashMap<String, String> = [
            (NODE_REASON.to_string(), NODE_REASON.to_string()),
            (END.to_string(), END.to_string()),
        ]
        .into_iter()
        .collect();
        let after_reasoning = router.clone();
        let after_grading = router;

        let mut graph = StateGraph::<ConversationState>::new();
        graph
            .add_node(NODE_REASON, Arc::new(reason))
            .add_node(NODE_ACT, Arc::new(act))
            .add_node(NODE_GRADE, Arc::new(grade))
            .add_edge(START, NODE_REASON)
            .add_conditional_edges(
                NODE_REASON,
                Arc::new(move |s: &ConversationState| {
                    after_reasoning.after_reasoning(s).as_str().to_string()
                }),
                Some(reason_map),
            )
            .add_edge(NODE_ACT, NODE_REASON)
            .add_conditional_edges(
                NODE_GRADE,
                Arc::new(move |s: &ConversationState| {
                    after_grading.after_grading(s).as_str().to_string()
                }),
                Some(grade_map),
            );
        let compiled = graph.compile_with_checkpointer(Arc::clone(&checkpointer))?;

        Ok(Self {
            compiled,
            checkpointer,
            tool_specs,
            recursion_limit: options.recursion_limit,
            session_locks: DashMap::new(),
        })
    }

    /// Tools offered to the model, in listing order.
    pub fn tool_specs(&self) -> &[ToolSpec] {
        &self.tool_specs
    }

    /// Latest saved state of a session, if any.
    pub async fn load_session(
        &self,
        session_id: &str,
    ) -> Result<Option<ConversationState>, CheckpointError> {
        let config = RunnableConfig::for_thread(session_id);
        Ok(self
            .checkpointer
            .get_tuple(&config)
            .await?
            .map(|(cp, _)| cp.channel_values))
    }

    fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        Arc::clone(
            self.session_locks
                .entry(session_id.to_string())
                .or_default()
                .value(),
        )
    }

    /// Drops the map entry unless another run still holds or waits on the lock
    /// (map + `lock` are the only two owners).
    fn release_session_lock(&self, session_id: &str, lock: Arc<Mutex<()>>) {
        self.session_locks.remove_if(session_id, |_, held| {
            Arc::ptr_eq(held, &lock) && Arc::strong_count(held) == 2
        });
    }

    /// Sessions with a run in flight or waiting for one.
    pub fn active_sessions(&self) -> usize {
        self.session_locks.len()
    }

    /// Runs one interaction and returns the final transcript.
    ///
    /// `session_id: None` starts a new session. A model failure aborts the run and leaves
    /// the stored session unchanged.
    pub async fn invoke(
        &self,
        question: &str,
        session_id: Option<&str>,
    ) -> Result<ConversationState, RunError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RunError::EmptyQuestion);
        }
        let session_id = session_id
            .map(str::to_string)
            .unwrap_or_else(new_session_id);

        let lock = self.session_lock(&session_id);
        let result = {
            let _guard = lock.lock().await;
            self.run_locked(question, &session_id).await
        };
        self.release_session_lock(&session_id, lock);
        result
    }

    async fn run_locked(
        &self,
        question: &str,
        session_id: &str,
    ) -> Result<ConversationState, RunError> {
        let mut state = match self.load_session(session_id).await? {
            Some(s) => {
                tracing::debug!(session_id = %session_id, turns = s.turn_count(), "resuming session");
                s
            }
            None => ConversationState::new(session_id),
        };
        state.push(Turn::user(question));

        let config =
            RunnableConfig::for_thread(session_id).with_recursion_limit(self.recursion_limit);
        let final_state = match self.compiled.invoke(state, Some(config)).await {
            Ok(s) => s,
            Err(AgentError::Checkpoint(e)) => return Err(RunError::Checkpoint(e)),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(
            session_id = %session_id,
            turns = final_state.turn_count(),
            "research interaction complete"
        );
        Ok(final_state)
    }

    /// `invoke` followed by answer extraction.
    pub async fn ask(
        &self,
        question: &str,
        session_id: Option<&str>,
    ) -> Result<AskOutcome, RunError> {
        let state = self.invoke(question, session_id).await?;
        Ok(AskOutcome {
            session_id: state.session_id().to_string(),
            answer: extract_answer(state.turns()),
            turn_count: state.turn_count(),
        })
    }
}
