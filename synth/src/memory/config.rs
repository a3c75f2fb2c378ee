//! Invoke config: which thread (session) a run belongs to and how many steps it may take.

/// Config for a single invoke. Identifies the thread and optional checkpoint.
///
/// **Interaction**: Passed to `CompiledStateGraph::invoke(state, config)` and
/// `Checkpointer::put` / `get_tuple` / `list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnableConfig {
    /// Conversation id. Required when using a checkpointer; the research runner uses the session id.
    pub thread_id: Option<String>,
    /// If set, `get_tuple` loads this checkpoint instead of the latest.
    pub checkpoint_id: Option<String>,
    /// Optional namespace for checkpoints. Default is empty.
    pub checkpoint_ns: String,
    /// Max node executions in one `invoke`; `None` uses `DEFAULT_RECURSION_LIMIT`.
    pub recursion_limit: Option<usize>,
}

impl RunnableConfig {
    /// Config addressing the latest checkpoint of `thread_id`.
    pub fn for_thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            ..Self::default()
        }
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = Some(limit);
        self
    }
}
