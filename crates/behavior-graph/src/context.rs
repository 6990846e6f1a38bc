//! Execution context handed to node and condition hooks.

use core::fmt;

use rand::rngs::StdRng;
use tracing::warn;

use crate::{Clock, Graph, NodeId, Status};

/// A node's view of the graph while one of its hooks runs.
///
/// The context is the only way a node can affect other nodes: it may start
/// and end its own children and read any node's status. Everything else
/// (siblings, ancestors) is out of reach.
pub struct Context<'a, C> {
    graph: &'a mut Graph<C>,
    id: NodeId,
    caller: Option<NodeId>,
}

impl<'a, C> Context<'a, C> {
    pub(crate) fn new(graph: &'a mut Graph<C>, id: NodeId, caller: Option<NodeId>) -> Self {
        Self { graph, id, caller }
    }

    /// The node whose hook is running.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The parent that issued the current start or end, or `None` when the
    /// graph itself (or its owner) did.
    #[inline]
    pub fn caller(&self) -> Option<NodeId> {
        self.caller
    }

    #[inline]
    pub fn clock(&self) -> Clock {
        self.graph.clock()
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.graph.clock().tick()
    }

    #[inline]
    pub fn delta_time(&self) -> f32 {
        self.graph.clock().delta_time()
    }

    #[inline]
    pub fn blackboard(&self) -> &C {
        self.graph.blackboard()
    }

    #[inline]
    pub fn blackboard_mut(&mut self) -> &mut C {
        self.graph.blackboard_mut()
    }

    /// Seeded generator shared by randomized leaves.
    #[inline]
    pub fn rng(&mut self) -> &mut StdRng {
        self.graph.rng_mut()
    }

    /// Number of distinct parents referencing this node.
    pub fn parent_count(&self) -> usize {
        self.graph.parents(self.id).len()
    }

    /// Current status of any node. Unknown ids read as `Uninitialized`.
    pub fn status(&self, node: NodeId) -> Status {
        self.graph.status(node)
    }

    /// Starts one of this node's children and returns the status it settled on.
    ///
    /// Starting a node that is not a child of this one is refused and
    /// reported as `Failure`.
    pub fn start_node(&mut self, child: NodeId) -> Status {
        if !self.graph.children(self.id).contains(&child) {
            self.log_failure(format_args!("cannot start {child}: not a child"));
            return Status::Failure;
        }
        self.graph.start_from(Some(self.id), child)
    }

    /// Ends one of this node's children. Ending a node that already ended is
    /// a no-op.
    pub fn end_node(&mut self, child: NodeId) {
        if !self.graph.children(self.id).contains(&child) {
            self.log_failure(format_args!("cannot end {child}: not a child"));
            return;
        }
        self.graph.end_from(Some(self.id), child);
    }

    /// Reports why this node is failing. Never affects control flow.
    pub fn log_failure(&self, reason: impl fmt::Display) {
        warn!(
            node = %self.id,
            label = self.graph.label(self.id),
            %reason,
            "node failure"
        );
    }
}
