//! Graph driver: owns the node arena and is the only mutator of node status.
//!
//! Nodes live in an arena indexed by [`NodeId`]. While a hook runs, the node
//! is taken out of its slot and handed a [`Context`] that borrows the rest of
//! the graph, so a node can start or end its children without aliasing
//! itself. A node that is reached again while one of its own hooks is still
//! on the stack is reported and resolved to `Failure`.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use tracing::{debug, trace, warn};

use crate::{Clock, Context, GraphBuilder, GraphSnapshot, Node, NodeId, NodeSnapshot, Status};

pub(crate) struct Slot<C> {
    pub(crate) node: Option<Box<dyn Node<C>>>,
    pub(crate) label: String,
    pub(crate) kind: &'static str,
    pub(crate) rank: u32,
    pub(crate) parents: Vec<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) status: Status,
    /// Started and not yet ended.
    pub(crate) live: bool,
    pub(crate) started_tick: Option<u64>,
    pub(crate) updated_tick: Option<u64>,
}

impl<C> Slot<C> {
    pub(crate) fn new(label: String, node: Box<dyn Node<C>>) -> Self {
        Self {
            kind: node.kind(),
            children: node.children().to_vec(),
            node: Some(node),
            label,
            rank: 0,
            parents: Vec::new(),
            status: Status::Uninitialized,
            live: false,
            started_tick: None,
            updated_tick: None,
        }
    }

    fn held(&self) -> bool {
        self.node.as_ref().is_some_and(|node| node.is_held())
    }
}

/// An executable behavior graph.
///
/// Built by [`GraphBuilder`]. The graph owns its nodes and the blackboard
/// `C`; dropping it drops all node state.
///
/// # Driving
///
/// ```rust,ignore
/// let mut graph = builder.build()?;
/// graph.start();
/// while graph.is_running() {
///     graph.advance(1.0 / 60.0);
/// }
/// ```
pub struct Graph<C> {
    slots: Vec<Slot<C>>,
    root: NodeId,
    /// Active nodes keyed by (rank, id) so iteration is parent before child.
    active: BTreeSet<(u32, NodeId)>,
    clock: Clock,
    rng: StdRng,
    blackboard: C,
}

impl<C> Graph<C> {
    /// Starts building a graph around the given blackboard.
    pub fn builder(blackboard: C) -> GraphBuilder<C> {
        GraphBuilder::new(blackboard)
    }

    pub(crate) fn from_parts(
        slots: Vec<Slot<C>>,
        root: NodeId,
        rng: StdRng,
        blackboard: C,
    ) -> Self {
        Self {
            slots,
            root,
            active: BTreeSet::new(),
            clock: Clock::default(),
            rng,
            blackboard,
        }
    }

    // ------------------------------------------------------------------------
    // Driving
    // ------------------------------------------------------------------------

    /// Starts the root node. Starting an already running root is a no-op that
    /// returns its current status.
    pub fn start(&mut self) -> Status {
        self.start_from(None, self.root)
    }

    /// Ends the root subtree and any other node still active.
    pub fn end(&mut self) {
        self.end_from(None, self.root);

        let stragglers: Vec<NodeId> = self.active.iter().map(|&(_, id)| id).collect();
        for id in stragglers {
            self.end_from(None, id);
        }
    }

    /// Ends the whole graph and starts the root again.
    pub fn restart(&mut self) -> Status {
        self.end();
        self.start()
    }

    /// Advances the clock by `delta` seconds and updates every active node
    /// once, parents before children.
    ///
    /// Nodes started during this tick are not updated until the next one.
    /// Returns the root status afterwards.
    pub fn advance(&mut self, delta: f32) -> Status {
        self.clock.advance(delta);
        let tick = self.clock.tick();

        let pending: Vec<NodeId> = self.active.iter().map(|&(_, id)| id).collect();
        for id in pending {
            let slot = &self.slots[id.index()];
            if !slot.live || !slot.status.is_active() {
                continue;
            }
            if slot.started_tick == Some(tick) || slot.updated_tick == Some(tick) {
                continue;
            }
            self.update(id);
        }

        self.status(self.root)
    }

    /// Starts a node on behalf of the graph owner.
    pub fn start_node(&mut self, id: NodeId) -> Status {
        self.start_from(None, id)
    }

    /// Ends a node on behalf of the graph owner, cancelling it if it is still
    /// active. Ending a node that is not live is a no-op.
    pub fn end_node(&mut self, id: NodeId) {
        self.end_from(None, id);
    }

    /// Updates a single node outside of [`advance`](Self::advance).
    ///
    /// A no-op unless the node is `Running` or `Waiting`.
    pub fn update_node(&mut self, id: NodeId) -> Status {
        self.update(id)
    }

    /// Puts a finished node back to `Uninitialized`.
    ///
    /// Refused (returns `false`) while the node is active, and for join nodes
    /// while parent activations are still outstanding. Cancel active nodes
    /// with [`end_node`](Self::end_node).
    pub fn reset_status(&mut self, id: NodeId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return false;
        };
        if slot.status.is_active() || slot.held() {
            return false;
        }
        slot.status = Status::Uninitialized;
        slot.live = false;
        true
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether the root is still `Running` or `Waiting`.
    pub fn is_running(&self) -> bool {
        self.status(self.root).is_active()
    }

    /// Current status of a node. Unknown ids read as `Uninitialized`.
    pub fn status(&self, id: NodeId) -> Status {
        self.slots
            .get(id.index())
            .map_or(Status::Uninitialized, |slot| slot.status)
    }

    pub fn label(&self, id: NodeId) -> &str {
        self.slots.get(id.index()).map_or("", |slot| &slot.label)
    }

    pub fn parents(&self, id: NodeId) -> &[NodeId] {
        self.slots.get(id.index()).map_or(&[], |slot| &slot.parents)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slots.get(id.index()).map_or(&[], |slot| &slot.children)
    }

    /// Nodes that will be updated on the next advance, parents first.
    pub fn active_nodes(&self) -> Vec<NodeId> {
        self.active.iter().map(|&(_, id)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn blackboard(&self) -> &C {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut C {
        &mut self.blackboard
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Captures the status of every node.
    pub fn snapshot(&self) -> GraphSnapshot {
        let nodes = self
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| NodeSnapshot {
                id: NodeId(index as u32),
                label: slot.label.clone(),
                kind: slot.kind.to_string(),
                status: slot.status,
                live: slot.live,
            })
            .collect();

        GraphSnapshot {
            clock: self.clock,
            root: self.root,
            nodes,
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    pub(crate) fn start_from(&mut self, caller: Option<NodeId>, id: NodeId) -> Status {
        let index = id.index();
        let Some(slot) = self.slots.get_mut(index) else {
            warn!(node = %id, "start requested for unknown node");
            return Status::Failure;
        };
        let Some(mut node) = slot.node.take() else {
            warn!(node = %id, label = %slot.label, "node re-entered while running a hook");
            return Status::Failure;
        };

        if slot.live && !node.is_join() {
            slot.node = Some(node);
            return slot.status;
        }
        if !slot.live {
            slot.status = Status::Uninitialized;
            slot.live = true;
        }
        slot.started_tick = Some(self.clock.tick());
        debug!(node = %id, label = %slot.label, caller = ?caller, "start");

        let status = node.on_start(&mut Context::new(self, id, caller));
        self.slots[index].node = Some(node);
        self.settle(id, status)
    }

    fn update(&mut self, id: NodeId) -> Status {
        let index = id.index();
        let tick = self.clock.tick();
        let Some(slot) = self.slots.get_mut(index) else {
            warn!(node = %id, "update requested for unknown node");
            return Status::Uninitialized;
        };
        if !slot.live || !slot.status.is_active() {
            return slot.status;
        }
        let Some(mut node) = slot.node.take() else {
            warn!(node = %id, label = %slot.label, "node re-entered while running a hook");
            return slot.status;
        };
        slot.updated_tick = Some(tick);
        trace!(node = %id, label = %slot.label, tick, "update");

        let status = node.on_update(&mut Context::new(self, id, None));
        self.slots[index].node = Some(node);
        self.settle(id, status)
    }

    pub(crate) fn end_from(&mut self, caller: Option<NodeId>, id: NodeId) {
        let index = id.index();
        let Some(slot) = self.slots.get_mut(index) else {
            warn!(node = %id, "end requested for unknown node");
            return;
        };
        if !slot.live {
            return;
        }
        let Some(mut node) = slot.node.take() else {
            warn!(node = %id, label = %slot.label, "node re-entered while running a hook");
            return;
        };

        node.on_end(&mut Context::new(self, id, caller));
        let held = node.is_held();

        let slot = &mut self.slots[index];
        slot.node = Some(node);
        if held {
            trace!(node = %id, label = %slot.label, caller = ?caller, "released, still held");
            return;
        }

        self.active.remove(&(slot.rank, id));
        slot.live = false;
        if slot.status.is_active() {
            slot.status = Status::Uninitialized;
        }
        debug!(node = %id, label = %slot.label, status = %slot.status, "end");

        let children = slot.children.clone();
        for child in children {
            self.end_from(Some(id), child);
        }
    }

    /// Records a hook result and finalizes the node if it completed.
    fn settle(&mut self, id: NodeId, status: Status) -> Status {
        let slot = &mut self.slots[id.index()];
        let status = if status == Status::Uninitialized {
            warn!(node = %id, label = %slot.label, "hook returned uninitialized");
            Status::Failure
        } else {
            status
        };
        slot.status = status;
        let key = (slot.rank, id);

        if status.is_active() {
            self.active.insert(key);
            return status;
        }

        self.active.remove(&key);
        if slot.held() {
            // Joins stay alive until every parent that started them lets go.
            trace!(node = %id, label = %slot.label, %status, "completed while held");
        } else {
            self.end_from(None, id);
        }
        status
    }
}
