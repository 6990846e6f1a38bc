//! Decorator nodes.
//!
//! Decorators wrap a single child and reshape its result or its execution:
//! [`Inverter`] (NOT logic), [`AlwaysSucceed`] (error suppression) and
//! [`Repeat`]. A decorator built without a child fails on start.

use crate::composite::child_outcome;
use crate::{Context, Node, NodeId, Status};

/// Inverts the result of its child.
///
/// # Semantics
///
/// - If the child returns `Success`, the inverter returns `Failure`
/// - If the child returns `Failure`, the inverter returns `Success`
///
/// This is analogous to a logical NOT (!) operation.
pub struct Inverter {
    child: Option<NodeId>,
}

impl Inverter {
    pub fn new(child: impl Into<Option<NodeId>>) -> Self {
        Self {
            child: child.into(),
        }
    }
}

impl<C> Node<C> for Inverter {
    fn children(&self) -> &[NodeId] {
        self.child.as_slice()
    }

    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(child) = self.child else {
            ctx.log_failure("inverter has no child");
            return Status::Failure;
        };
        waiting_unless_terminal(ctx.start_node(child)).invert()
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(child) = self.child else {
            return Status::Failure;
        };
        waiting_unless_terminal(child_outcome(ctx, child)).invert()
    }
}

/// Always returns `Success` once its child completes, regardless of the
/// child's result.
///
/// This is useful for:
/// - Optional behaviors that shouldn't cause a sequence to fail
/// - Observing nodes that must not affect control flow
pub struct AlwaysSucceed {
    child: Option<NodeId>,
}

impl AlwaysSucceed {
    pub fn new(child: impl Into<Option<NodeId>>) -> Self {
        Self {
            child: child.into(),
        }
    }
}

impl<C> Node<C> for AlwaysSucceed {
    fn children(&self) -> &[NodeId] {
        self.child.as_slice()
    }

    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(child) = self.child else {
            ctx.log_failure("always-succeed has no child");
            return Status::Failure;
        };
        succeed_when_terminal(ctx.start_node(child))
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(child) = self.child else {
            return Status::Failure;
        };
        succeed_when_terminal(child_outcome(ctx, child))
    }
}

/// Restarts its child every time it completes.
///
/// With a count, the repeat succeeds after that many completions; without
/// one it runs until it is ended. A failing child does not stop the repeat.
/// At most one completion is consumed per hook call, so a child that finishes
/// instantly repeats once per tick rather than spinning.
pub struct Repeat {
    child: Option<NodeId>,
    count: Option<u32>,
    completed: u32,
}

impl Repeat {
    /// Repeats until ended.
    pub fn forever(child: impl Into<Option<NodeId>>) -> Self {
        Self {
            child: child.into(),
            count: None,
            completed: 0,
        }
    }

    /// Repeats `count` times, then succeeds.
    pub fn times(child: impl Into<Option<NodeId>>, count: u32) -> Self {
        Self {
            child: child.into(),
            count: Some(count),
            completed: 0,
        }
    }

    /// Completions observed during the current activation.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    fn step<C>(&mut self, ctx: &mut Context<'_, C>, child: NodeId, status: Status) -> Status {
        if !status.is_terminal() {
            return Status::Waiting;
        }

        self.completed = self.completed.saturating_add(1);
        if self.count.is_some_and(|count| self.completed >= count) {
            return Status::Success;
        }

        // A child that completes again right away is picked up next tick.
        ctx.start_node(child);
        Status::Waiting
    }
}

impl<C> Node<C> for Repeat {
    fn children(&self) -> &[NodeId] {
        self.child.as_slice()
    }

    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        self.completed = 0;
        let Some(child) = self.child else {
            ctx.log_failure("repeat has no child");
            return Status::Failure;
        };
        if self.count == Some(0) {
            return Status::Success;
        }
        let status = ctx.start_node(child);
        self.step(ctx, child, status)
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(child) = self.child else {
            return Status::Failure;
        };
        let status = child_outcome(ctx, child);
        self.step(ctx, child, status)
    }

    fn on_end(&mut self, _ctx: &mut Context<'_, C>) {
        self.completed = 0;
    }
}

fn waiting_unless_terminal(status: Status) -> Status {
    if status.is_terminal() {
        status
    } else {
        Status::Waiting
    }
}

fn succeed_when_terminal(status: Status) -> Status {
    if status.is_terminal() {
        Status::Success
    } else {
        Status::Waiting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Graph, Wait};

    struct TestContext {
        value: i32,
    }

    #[test]
    fn inverter_inverts_success() {
        let mut builder = Graph::builder(TestContext { value: 10 });
        let check = builder.add(Action::new(|ctx: &mut Context<'_, TestContext>| {
            if ctx.blackboard().value > 0 {
                Status::Success
            } else {
                Status::Failure
            }
        }));
        builder.add(Inverter::new(check));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start(), Status::Failure);
        graph.blackboard_mut().value = -10;
        assert_eq!(graph.restart(), Status::Success);
    }

    #[test]
    fn inverter_keeps_waiting_while_child_runs() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let wait = builder.add(Wait::new(1.0));
        builder.add(Inverter::new(wait));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start(), Status::Waiting);
        graph.advance(1.0);
        assert_eq!(graph.advance(1.0), Status::Failure);
    }

    #[test]
    fn always_succeed_on_failure() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let fail = builder.add(Action::new(|ctx: &mut Context<'_, TestContext>| {
            ctx.blackboard_mut().value += 1;
            Status::Failure
        }));
        builder.add(AlwaysSucceed::new(fail));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start(), Status::Success);
        assert_eq!(graph.blackboard().value, 1); // Child still executed
    }

    #[test]
    fn missing_child_fails_on_start() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let inverter = builder.add(Inverter::new(None));
        let always = builder.add(AlwaysSucceed::new(None));
        let repeat = builder.add(Repeat::forever(None));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start_node(inverter), Status::Failure);
        assert_eq!(graph.start_node(always), Status::Failure);
        assert_eq!(graph.start_node(repeat), Status::Failure);
    }

    #[test]
    fn repeat_counts_one_completion_per_tick() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let bump = builder.add(Action::new(|ctx: &mut Context<'_, TestContext>| {
            ctx.blackboard_mut().value += 1;
            Status::Success
        }));
        builder.add(Repeat::times(bump, 3));
        let mut graph = builder.build().unwrap();

        // First completion and a restart happen on start.
        assert_eq!(graph.start(), Status::Waiting);
        assert_eq!(graph.blackboard().value, 2);
        assert_eq!(graph.advance(0.1), Status::Waiting);
        assert_eq!(graph.blackboard().value, 3);
        // Third completion observed; no further restart.
        assert_eq!(graph.advance(0.1), Status::Success);
        assert_eq!(graph.blackboard().value, 3);
    }

    #[test]
    fn repeat_forever_keeps_running() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let bump = builder.add(Action::new(|ctx: &mut Context<'_, TestContext>| {
            ctx.blackboard_mut().value += 1;
            Status::Failure
        }));
        builder.add(Repeat::forever(bump));
        let mut graph = builder.build().unwrap();

        graph.start();
        for _ in 0..5 {
            assert_eq!(graph.advance(0.1), Status::Waiting);
        }
        assert_eq!(graph.blackboard().value, 7);
    }
}
