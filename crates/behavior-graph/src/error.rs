//! Errors raised while assembling a graph.
//!
//! Execution itself never fails with an error: misconfigured nodes resolve
//! to [`Status::Failure`](crate::Status::Failure) at runtime. Only faults the
//! builder can detect up front are reported here.

use crate::NodeId;

/// Configuration faults detected by [`GraphBuilder::build`](crate::GraphBuilder::build).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The builder holds no nodes.
    #[error("graph has no nodes")]
    Empty,

    /// The configured root does not name a node of this builder.
    #[error("root {root} does not exist (graph has {len} nodes)")]
    UnknownRoot {
        /// Requested root id.
        root: NodeId,
        /// Number of nodes in the builder.
        len: usize,
    },

    /// A node lists a child id that does not name a node of this builder.
    #[error("node {parent} references unknown child {child}")]
    UnknownChild {
        /// Node holding the dangling reference.
        parent: NodeId,
        /// The missing child id.
        child: NodeId,
    },

    /// A node that is not a join is referenced by more than one parent.
    #[error("node {child} is shared by {parents} parents but is not a join")]
    SharedChild {
        /// The shared node.
        child: NodeId,
        /// Number of distinct parents referencing it.
        parents: usize,
    },

    /// Children references form a cycle.
    #[error("cycle detected through node {node}")]
    Cycle {
        /// A node that lies on the cycle.
        node: NodeId,
    },
}

pub type Result<T> = std::result::Result<T, GraphError>;
