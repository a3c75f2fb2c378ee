//! Next-step result from a graph node: follow the edge, jump to a node, or end.

/// Next step after running a node.
///
/// - **Continue**: follow the node's outgoing edge (or the linear order when there is one).
/// - **Node(id)**: jump to the given node.
/// - **End**: stop; return current state as final result.
///
/// Nodes with conditional edges have their `Next` ignored; the router decides.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Next {
    Continue,
    Node(String),
    End,
}
