//! Graph assembly.
//!
//! Nodes are added bottom-up: a child is added first, and the [`NodeId`] it
//! returns is handed to its parent's constructor. [`GraphBuilder::build`]
//! derives parent lists from the children each node reports, checks the
//! wiring, and computes the parent-before-child order used by
//! [`Graph::advance`].

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{GraphError, Result};
use crate::graph::Slot;
use crate::{Graph, Node, NodeId};

/// Incrementally assembles a [`Graph`].
///
/// # Example
///
/// ```rust,ignore
/// use behavior_graph::{Graph, Sequence, Wait};
///
/// let mut builder = Graph::builder(());
/// let first = builder.add(Wait::new(1.0));
/// let second = builder.add(Wait::new(0.5));
/// let root = builder.add_named("pause twice", Sequence::new(vec![first, second]));
/// let graph = builder.with_root(root).build()?;
/// ```
pub struct GraphBuilder<C> {
    slots: Vec<Slot<C>>,
    root: Option<NodeId>,
    seed: u64,
    blackboard: C,
}

impl<C> GraphBuilder<C> {
    pub fn new(blackboard: C) -> Self {
        Self {
            slots: Vec::new(),
            root: None,
            seed: 0,
            blackboard,
        }
    }

    /// Adds a node labelled with its kind.
    pub fn add<N>(&mut self, node: N) -> NodeId
    where
        N: Node<C> + 'static,
    {
        let label = node.kind().to_string();
        self.add_named(label, node)
    }

    /// Adds a node with an explicit label.
    pub fn add_named<N>(&mut self, label: impl Into<String>, node: N) -> NodeId
    where
        N: Node<C> + 'static,
    {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot::new(label.into(), Box::new(node)));
        id
    }

    /// Selects the root. Defaults to the most recently added node.
    pub fn set_root(&mut self, root: NodeId) -> &mut Self {
        self.root = Some(root);
        self
    }

    pub fn with_root(mut self, root: NodeId) -> Self {
        self.root = Some(root);
        self
    }

    /// Seeds the generator used by randomized leaves such as
    /// [`WaitRange`](crate::WaitRange).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Validates the wiring and produces an executable graph.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Empty`] when no node was added
    /// - [`GraphError::UnknownRoot`] / [`GraphError::UnknownChild`] for ids
    ///   that do not belong to this builder
    /// - [`GraphError::SharedChild`] when a non-join node has several parents
    /// - [`GraphError::Cycle`] when children references loop
    pub fn build(self) -> Result<Graph<C>> {
        let Self {
            mut slots,
            root,
            seed,
            blackboard,
        } = self;

        let len = slots.len();
        if len == 0 {
            return Err(GraphError::Empty);
        }

        let root = root.unwrap_or(NodeId(len as u32 - 1));
        if root.index() >= len {
            return Err(GraphError::UnknownRoot { root, len });
        }

        link_parents(&mut slots)?;
        rank_nodes(&mut slots)?;

        Ok(Graph::from_parts(
            slots,
            root,
            StdRng::seed_from_u64(seed),
            blackboard,
        ))
    }
}

/// Fills every slot's parent list from the children lists.
fn link_parents<C>(slots: &mut [Slot<C>]) -> Result<()> {
    let len = slots.len();
    for index in 0..len {
        let parent = NodeId(index as u32);
        let children = slots[index].children.clone();
        for child in children {
            if child.index() >= len {
                return Err(GraphError::UnknownChild { parent, child });
            }
            let parents = &mut slots[child.index()].parents;
            if !parents.contains(&parent) {
                parents.push(parent);
            }
        }
    }

    for (index, slot) in slots.iter().enumerate() {
        let is_join = slot.node.as_ref().is_some_and(|node| node.is_join());
        if slot.parents.len() > 1 && !is_join {
            return Err(GraphError::SharedChild {
                child: NodeId(index as u32),
                parents: slot.parents.len(),
            });
        }
    }

    Ok(())
}

/// Assigns each slot its position in a topological order (Kahn's algorithm,
/// lowest id first among ready nodes).
fn rank_nodes<C>(slots: &mut [Slot<C>]) -> Result<()> {
    let mut pending: Vec<usize> = slots.iter().map(|slot| slot.parents.len()).collect();
    let mut ready: VecDeque<usize> = (0..slots.len()).filter(|&i| pending[i] == 0).collect();
    let mut next_rank = 0u32;

    while let Some(index) = ready.pop_front() {
        slots[index].rank = next_rank;
        next_rank += 1;

        let children = slots[index].children.clone();
        let mut seen = Vec::with_capacity(children.len());
        for child in children {
            if seen.contains(&child) {
                continue;
            }
            seen.push(child);
            let remaining = &mut pending[child.index()];
            *remaining -= 1;
            if *remaining == 0 {
                ready.push_back(child.index());
            }
        }
    }

    if (next_rank as usize) < slots.len() {
        let node = pending
            .iter()
            .position(|&remaining| remaining > 0)
            .map_or(NodeId(0), |index| NodeId(index as u32));
        return Err(GraphError::Cycle { node });
    }

    Ok(())
}
