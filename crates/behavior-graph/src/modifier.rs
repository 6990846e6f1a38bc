//! Condition-driven modifiers: [`Abort`] and [`Restart`].
//!
//! Both wrap exactly one child and a [`ConditionSet`]. Conditions are set up
//! when the modifier starts and torn down when it ends, however it ends.
//! While the child runs, the conditions are checked once per update; an
//! empty condition list never triggers.

use tracing::debug;

use crate::composite::child_outcome;
use crate::{Condition, ConditionSet, Context, Node, NodeId, Status};

/// Starts the conditions, then the child. Mirrors a child that completes at
/// once; otherwise `Running`.
fn start_guarded<C>(
    ctx: &mut Context<'_, C>,
    child: NodeId,
    conditions: &mut ConditionSet<C>,
) -> Status {
    conditions.start(ctx);
    let status = ctx.start_node(child);
    if status.is_terminal() {
        status
    } else {
        Status::Running
    }
}

/// Cancels its child and fails as soon as its conditions trigger.
///
/// # Example
///
/// ```rust,ignore
/// // Stop patrolling the moment an intruder is seen.
/// let patrol = builder.add(Abort::new(route).with_condition(Predicate::new(
///     |world: &World| world.intruder_visible(),
/// )));
/// ```
pub struct Abort<C> {
    child: Option<NodeId>,
    conditions: ConditionSet<C>,
}

impl<C> Abort<C> {
    pub fn new(child: impl Into<Option<NodeId>>) -> Self {
        Self {
            child: child.into(),
            conditions: ConditionSet::default(),
        }
    }

    pub fn with_condition<K>(mut self, condition: K) -> Self
    where
        K: Condition<C> + 'static,
    {
        self.conditions.push(condition);
        self
    }

    /// AND (`true`) or OR (`false`, the default) across conditions.
    pub fn requires_all(mut self, requires_all: bool) -> Self {
        self.conditions.set_requires_all(requires_all);
        self
    }
}

impl<C> Node<C> for Abort<C> {
    fn children(&self) -> &[NodeId] {
        self.child.as_slice()
    }

    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(child) = self.child else {
            ctx.log_failure("abort has no child");
            return Status::Failure;
        };
        start_guarded(ctx, child, &mut self.conditions)
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(child) = self.child else {
            return Status::Failure;
        };
        let status = child_outcome(ctx, child);
        if status.is_terminal() {
            return status;
        }

        if self.conditions.check(ctx) {
            debug!(node = %ctx.id(), %child, "abort triggered");
            ctx.end_node(child);
            return Status::Failure;
        }
        Status::Running
    }

    fn on_end(&mut self, ctx: &mut Context<'_, C>) {
        self.conditions.end(ctx);
    }
}

/// Ends and restarts its child whenever its conditions trigger.
///
/// Condition state is reset on every restart. The restart keeps running
/// until the child completes on its own.
pub struct Restart<C> {
    child: Option<NodeId>,
    conditions: ConditionSet<C>,
    restarts: u32,
}

impl<C> Restart<C> {
    pub fn new(child: impl Into<Option<NodeId>>) -> Self {
        Self {
            child: child.into(),
            conditions: ConditionSet::default(),
            restarts: 0,
        }
    }

    pub fn with_condition<K>(mut self, condition: K) -> Self
    where
        K: Condition<C> + 'static,
    {
        self.conditions.push(condition);
        self
    }

    /// AND (`true`) or OR (`false`, the default) across conditions.
    pub fn requires_all(mut self, requires_all: bool) -> Self {
        self.conditions.set_requires_all(requires_all);
        self
    }

    /// Restarts performed during the current activation.
    pub fn restarts(&self) -> u32 {
        self.restarts
    }
}

impl<C> Node<C> for Restart<C> {
    fn children(&self) -> &[NodeId] {
        self.child.as_slice()
    }

    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        self.restarts = 0;
        let Some(child) = self.child else {
            ctx.log_failure("restart has no child");
            return Status::Failure;
        };
        start_guarded(ctx, child, &mut self.conditions)
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(child) = self.child else {
            return Status::Failure;
        };
        let status = child_outcome(ctx, child);
        if status.is_terminal() {
            return status;
        }

        if self.conditions.check(ctx) {
            self.restarts = self.restarts.saturating_add(1);
            debug!(node = %ctx.id(), %child, restarts = self.restarts, "restart triggered");
            ctx.end_node(child);
            self.conditions.restart(ctx);
            ctx.start_node(child);
        }
        Status::Running
    }

    fn on_end(&mut self, ctx: &mut Context<'_, C>) {
        self.conditions.end(ctx);
    }
}
