//! Join nodes: barrier synchronization of several parents over one child.
//!
//! A join is referenced by more than one parent, and each of them may start
//! it independently. The join records every start as an arrival and
//! produces one coherent activation of its child per synchronization round:
//!
//! - [`WaitForAny`] activates the child on the first arrival of a tick and
//!   replays the resulting status to later arrivals of the same tick.
//! - [`WaitForAll`] activates the child only once every parent has arrived.
//!
//! Parents release their arrival when they end the join. The join, and
//! with it the child, is torn down only once no arrival is outstanding.
//! An end issued by the graph owner instead of a parent clears every
//! arrival at once.

use crate::{Context, Node, NodeId, Status};

/// Arrival bookkeeping shared by both join kinds.
#[derive(Debug, Default)]
struct Arrivals {
    /// One entry per start: the parent that issued it, or `None` for starts
    /// issued by the graph owner.
    starts: Vec<Option<NodeId>>,
}

impl Arrivals {
    /// Records a start. Returns `false` when `caller` already arrived.
    fn arrive(&mut self, caller: Option<NodeId>) -> bool {
        if caller.is_some() && self.starts.contains(&caller) {
            return false;
        }
        self.starts.push(caller);
        true
    }

    fn release(&mut self, caller: Option<NodeId>) {
        match caller {
            Some(parent) => self.starts.retain(|start| *start != Some(parent)),
            None => self.starts.clear(),
        }
    }

    fn count(&self) -> usize {
        self.starts.len()
    }

    fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

/// Maps a child's status to the join's: terminal results pass through,
/// anything in flight means the join is blocked on its child.
fn blocked_on(status: Status) -> Status {
    if status.is_terminal() {
        status
    } else {
        Status::Waiting
    }
}

/// Runs its child as soon as any parent arrives.
///
/// All parents arriving during the same tick share one activation of the
/// child and observe the same status, including parents that arrive after
/// earlier ones already finished with it. A parent arriving on a later tick
/// joins a child that is still running, or re-evaluates a child that
/// already completed.
pub struct WaitForAny {
    child: Option<NodeId>,
    arrivals: Arrivals,
    activated_tick: Option<u64>,
    last: Status,
}

impl WaitForAny {
    pub fn new(child: impl Into<Option<NodeId>>) -> Self {
        Self {
            child: child.into(),
            arrivals: Arrivals::default(),
            activated_tick: None,
            last: Status::Uninitialized,
        }
    }

    /// Outstanding parent starts.
    pub fn start_count(&self) -> usize {
        self.arrivals.count()
    }
}

impl<C> Node<C> for WaitForAny {
    fn children(&self) -> &[NodeId] {
        self.child.as_slice()
    }

    fn is_join(&self) -> bool {
        true
    }

    fn is_held(&self) -> bool {
        !self.arrivals.is_empty()
    }

    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(child) = self.child else {
            ctx.log_failure("wait-for-any has no child");
            return Status::Failure;
        };

        let tick = ctx.tick();
        self.arrivals.arrive(ctx.caller());
        if self.activated_tick == Some(tick) && self.last.is_terminal() {
            return self.last;
        }
        self.activated_tick = Some(tick);

        if ctx.status(child).is_active() {
            // Join the activation already in flight.
            self.last = Status::Waiting;
            return self.last;
        }

        self.last = blocked_on(ctx.start_node(child));
        self.last
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(child) = self.child else {
            return Status::Failure;
        };
        self.last = match ctx.status(child) {
            Status::Uninitialized => {
                ctx.log_failure(format_args!("child {child} was ended externally"));
                Status::Failure
            }
            status => blocked_on(status),
        };
        self.last
    }

    fn on_end(&mut self, ctx: &mut Context<'_, C>) {
        let caller = ctx.caller();
        self.arrivals.release(caller);

        // A result stays replayable for the rest of its tick, even after
        // every parent let go. Cancellations forget it.
        let cancelled = caller.is_none() || !self.last.is_terminal();
        if self.arrivals.is_empty() && cancelled {
            self.activated_tick = None;
            self.last = Status::Uninitialized;
        }
    }
}

/// Runs its child once every parent has arrived.
///
/// Until then the join reports `Running` ("still collecting parents") and
/// leaves the child untouched. A parent that starts the join twice in one
/// round is counted once.
pub struct WaitForAll {
    child: Option<NodeId>,
    arrivals: Arrivals,
    last: Status,
}

impl WaitForAll {
    pub fn new(child: impl Into<Option<NodeId>>) -> Self {
        Self {
            child: child.into(),
            arrivals: Arrivals::default(),
            last: Status::Uninitialized,
        }
    }

    /// Outstanding parent starts.
    pub fn start_count(&self) -> usize {
        self.arrivals.count()
    }

    fn collecting(&self, parents: usize) -> bool {
        self.arrivals.count() < parents.max(1)
    }
}

impl<C> Node<C> for WaitForAll {
    fn children(&self) -> &[NodeId] {
        self.child.as_slice()
    }

    fn is_join(&self) -> bool {
        true
    }

    fn is_held(&self) -> bool {
        !self.arrivals.is_empty()
    }

    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(child) = self.child else {
            ctx.log_failure("wait-for-all has no child");
            return Status::Failure;
        };

        let parents = ctx.parent_count();
        let full = !self.collecting(parents);
        if full || !self.arrivals.arrive(ctx.caller()) {
            return self.last;
        }

        if self.collecting(parents) {
            self.last = Status::Running;
            return self.last;
        }

        self.last = blocked_on(ctx.start_node(child));
        self.last
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(child) = self.child else {
            return Status::Failure;
        };
        if self.collecting(ctx.parent_count()) {
            return Status::Running;
        }
        self.last = match ctx.status(child) {
            Status::Uninitialized => {
                ctx.log_failure(format_args!("child {child} was ended externally"));
                Status::Failure
            }
            status => blocked_on(status),
        };
        self.last
    }

    fn on_end(&mut self, ctx: &mut Context<'_, C>) {
        self.arrivals.release(ctx.caller());
        if self.arrivals.is_empty() {
            self.last = Status::Uninitialized;
        }
    }
}
