//! Point-in-time view of a graph's node states.

use crate::{Clock, NodeId, Status};

/// Status of every node at one instant, in arena order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphSnapshot {
    pub clock: Clock,
    pub root: NodeId,
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub label: String,
    pub kind: String,
    pub status: Status,
    /// Started and not yet ended.
    pub live: bool,
}

impl GraphSnapshot {
    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.get(id.index())
    }

    /// Nodes whose status differs from `previous`, paired with the old status.
    pub fn changes_since<'a>(
        &'a self,
        previous: &'a GraphSnapshot,
    ) -> impl Iterator<Item = (&'a NodeSnapshot, Status)> + 'a {
        self.nodes.iter().filter_map(move |node| {
            let before = previous
                .node(node.id)
                .map_or(Status::Uninitialized, |old| old.status);
            (before != node.status).then_some((node, before))
        })
    }
}
