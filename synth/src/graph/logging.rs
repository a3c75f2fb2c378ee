//! Structured logging for graph execution events.

use std::fmt::Debug;

use super::Next;
use crate::error::AgentError;

pub fn log_node_start(node_id: &str) {
    tracing::debug!(node_id = node_id, "Starting node execution");
}

/// Logs the input state of a node at trace level (transcripts get long).
pub fn log_node_state<S: Debug>(node_id: &str, state: &S) {
    tracing::trace!(node_id = node_id, state = ?state, "Node execution: state");
}

pub fn log_node_complete(node_id: &str, next: &Next) {
    tracing::debug!(node_id = node_id, ?next, "Node execution complete");
}

pub fn log_routing(from: &str, to: &str) {
    tracing::debug!(from = %from, to = %to, "conditional routing");
}

pub fn log_graph_start() {
    tracing::info!("Starting graph execution");
}

pub fn log_graph_complete(steps: usize) {
    tracing::info!(steps, "Graph execution complete");
}

pub fn log_graph_error(error: &AgentError) {
    tracing::error!(?error, "Graph execution error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_functions_do_not_panic_without_subscriber() {
        log_node_start("reason");
        log_node_state("reason", &());
        log_node_complete("reason", &Next::End);
        log_routing("reason", "grade");
        log_graph_start();
        log_graph_complete(3);
        log_graph_error(&AgentError::ExecutionFailed("test".to_string()));
    }
}
