//! Compiled state graph: immutable, supports invoke only.
//!
//! Built by `StateGraph::compile` or `compile_with_checkpointer`. When a checkpointer is set
//! and `config.thread_id` is provided, the final state is saved once after the run; a run
//! that fails part-way saves nothing. A run that executes `recursion_limit` nodes (default
//! [`DEFAULT_RECURSION_LIMIT`]) without reaching END fails with `AgentError::RecursionLimit`.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::AgentError;
use crate::memory::{Checkpoint, CheckpointSource, Checkpointer, RunnableConfig};

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state, log_routing,
};
use super::state_graph::END;
use super::{Next, NextEntry, Node};

/// Node executions allowed per `invoke` when the config sets none.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Compiled graph: immutable structure, supports invoke only.
///
/// Runs from the node after START; after each node, a conditional router (when present)
/// or the node's returned `Next` picks the next node.
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) first_node_id: String,
    /// Node id -> how to get the next node.
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) checkpointer: Option<Arc<dyn Checkpointer<S>>>,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Runs the graph with the given state until a node routes to END.
    ///
    /// - `Next::Continue`: follow the node's outgoing edge.
    /// - `Next::Node(id)`: run the node with that id next.
    /// - `Next::End`: stop and return current state.
    ///
    /// Nodes with conditional edges ignore `Next`; the router decides.
    /// Pass `None` for config to run without persistence.
    pub async fn invoke(&self, state: S, config: Option<RunnableConfig>) -> Result<S, AgentError> {
        if !self.nodes.contains_key(&self.first_node_id) {
            return Err(AgentError::ExecutionFailed("empty graph".into()));
        }
        log_graph_start();

        let limit = config
            .as_ref()
            .and_then(|c| c.recursion_limit)
            .unwrap_or(DEFAULT_RECURSION_LIMIT);
        let mut state = state;
        let mut current_id = self.first_node_id.clone();
        let mut steps = 0usize;
        loop {
            let node = match self.nodes.get(&current_id) {
                Some(n) => Arc::clone(n),
                None => {
                    let e = AgentError::ExecutionFailed(format!("unknown node: {}", current_id));
                    log_graph_error(&e);
                    return Err(e);
                }
            };

            log_node_start(&current_id);
            log_node_state(&current_id, &state);

            let (new_state, next) = match node.run(state).await {
                Ok(output) => output,
                Err(e) => {
                    log_graph_error(&e);
                    return Err(e);
                }
            };
            state = new_state;
            steps += 1;
            log_node_complete(&current_id, &next);

            let next_id = match self.next_map.get(&current_id) {
                Some(NextEntry::Conditional(router)) => {
                    let target = router.resolve_next(&state);
                    log_routing(&current_id, &target);
                    Some(target)
                }
                Some(NextEntry::Unconditional(to)) => match next {
                    Next::End => None,
                    Next::Node(id) => Some(id),
                    Next::Continue => Some(to.clone()),
                },
                None => match next {
                    Next::Node(id) => Some(id),
                    Next::Continue | Next::End => None,
                },
            };

            match next_id {
                Some(id) if id != END => {
                    if steps >= limit {
                        let e = AgentError::RecursionLimit(limit);
                        log_graph_error(&e);
                        return Err(e);
                    }
                    current_id = id;
                }
                _ => break,
            }
        }

        if let Err(e) = self.save_final(&state, config.as_ref(), steps).await {
            log_graph_error(&e);
            return Err(e);
        }
        log_graph_complete(steps);
        Ok(state)
    }

    async fn save_final(
        &self,
        state: &S,
        config: Option<&RunnableConfig>,
        steps: usize,
    ) -> Result<(), AgentError> {
        let (Some(cp), Some(cfg)) = (&self.checkpointer, config) else {
            return Ok(());
        };
        if cfg.thread_id.is_none() {
            return Ok(());
        }
        let checkpoint = Checkpoint::from_state(state.clone(), CheckpointSource::Loop, steps as i64);
        let id = cp.put(cfg, &checkpoint).await?;
        tracing::debug!(thread_id = ?cfg.thread_id, checkpoint_id = %id, "checkpoint saved");
        Ok(())
    }

    /// Whether a checkpointer was attached at compile time.
    pub fn has_checkpointer(&self) -> bool {
        self.checkpointer.is_some()
    }
}
