//! State graph: nodes + edges (fixed or conditional), compile and invoke.
//!
//! Build a [`StateGraph`], add nodes and edges (with [`START`] / [`END`] sentinels),
//! compile it (optionally with a checkpointer), then [`CompiledStateGraph::invoke`] with state.

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod next;
mod node;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, DEFAULT_RECURSION_LIMIT};
pub use conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state, log_routing,
};
pub use next::Next;
pub use node::Node;
pub use state_graph::{StateGraph, END, START};
