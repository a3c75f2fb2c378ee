//! Agent execution error types.
//!
//! Returned by graph nodes and `CompiledStateGraph::invoke`. Tool failures never
//! surface here; the act step turns them into tool-result text.

use thiserror::Error;

use crate::memory::CheckpointError;

/// Agent execution error.
///
/// A node returns this when its step cannot complete (e.g. the model call failed).
/// The graph stops on the first error and nothing is saved for that run.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. LLM call failed, request build failed).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The run executed `recursion_limit` nodes without reaching END.
    #[error("recursion limit of {0} steps reached without finishing")]
    RecursionLimit(usize),

    /// The final state could not be written to the checkpointer.
    #[error("checkpoint: {0}")]
    Checkpoint(#[from] CheckpointError),
}
