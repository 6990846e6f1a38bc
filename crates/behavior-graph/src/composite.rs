//! Composite nodes.
//!
//! Composite nodes control the execution flow of several children:
//! [`Sequence`] (AND logic), [`Selector`] (OR logic) and [`Parallel`].
//! Children are started through the graph; a composite reports `Waiting`
//! while it is blocked on one of them.

use crate::{Context, Node, NodeId, Status};

/// Reads a child's status from its parent's point of view.
///
/// A child that reads `Uninitialized` was ended behind its parent's back;
/// the parent treats that as a failure.
pub(crate) fn child_outcome<C>(ctx: &Context<'_, C>, child: NodeId) -> Status {
    match ctx.status(child) {
        Status::Uninitialized => {
            ctx.log_failure(format_args!("child {child} was ended externally"));
            Status::Failure
        }
        status => status,
    }
}

/// Runs children one after another until one fails.
///
/// # Semantics
///
/// - If a child returns `Failure`, the sequence **stops** and returns `Failure`
/// - If a child returns `Success`, the sequence **continues** with the next child
/// - While a child runs, the sequence is `Waiting`
/// - If all children succeed (or there are none), the sequence returns `Success`
pub struct Sequence {
    children: Vec<NodeId>,
    index: usize,
}

impl Sequence {
    pub fn new(children: Vec<NodeId>) -> Self {
        Self { children, index: 0 }
    }

    /// Starts children from `index` on until one does not succeed at once.
    fn run<C>(&mut self, ctx: &mut Context<'_, C>) -> Status {
        while let Some(&child) = self.children.get(self.index) {
            match ctx.start_node(child) {
                Status::Success => self.index += 1,
                Status::Failure => return Status::Failure,
                _ => return Status::Waiting,
            }
        }
        Status::Success
    }
}

impl<C> Node<C> for Sequence {
    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        self.index = 0;
        self.run(ctx)
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(&child) = self.children.get(self.index) else {
            return Status::Success;
        };
        match child_outcome(ctx, child) {
            Status::Success => {
                self.index += 1;
                self.run(ctx)
            }
            Status::Failure => Status::Failure,
            _ => Status::Waiting,
        }
    }

    fn on_end(&mut self, _ctx: &mut Context<'_, C>) {
        self.index = 0;
    }
}

/// Runs children one after another until one succeeds.
///
/// # Semantics
///
/// - If a child returns `Success`, the selector **stops** and returns `Success`
/// - If a child returns `Failure`, the selector **continues** with the next child
/// - If all children fail (or there are none), the selector returns `Failure`
pub struct Selector {
    children: Vec<NodeId>,
    index: usize,
}

impl Selector {
    pub fn new(children: Vec<NodeId>) -> Self {
        Self { children, index: 0 }
    }

    fn run<C>(&mut self, ctx: &mut Context<'_, C>) -> Status {
        while let Some(&child) = self.children.get(self.index) {
            match ctx.start_node(child) {
                Status::Failure => self.index += 1,
                Status::Success => return Status::Success,
                _ => return Status::Waiting,
            }
        }
        Status::Failure
    }
}

impl<C> Node<C> for Selector {
    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        self.index = 0;
        self.run(ctx)
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(&child) = self.children.get(self.index) else {
            return Status::Failure;
        };
        match child_outcome(ctx, child) {
            Status::Failure => {
                self.index += 1;
                self.run(ctx)
            }
            Status::Success => Status::Success,
            _ => Status::Waiting,
        }
    }

    fn on_end(&mut self, _ctx: &mut Context<'_, C>) {
        self.index = 0;
    }
}

/// Completion policy of a [`Parallel`] node.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ParallelMode {
    /// Wait for every child; fail if any failed.
    #[default]
    All,
    /// Succeed as soon as one child succeeds; fail once all failed.
    UntilAnySucceeds,
    /// Fail as soon as one child fails; succeed once all succeeded.
    UntilAnyFails,
    /// Mirror the first child (in child order) that completes.
    UntilAnyCompletes,
}

/// Starts every child in the same activation and completes according to
/// its [`ParallelMode`].
///
/// Children still running when the parallel completes are ended with it.
pub struct Parallel {
    children: Vec<NodeId>,
    mode: ParallelMode,
}

impl Parallel {
    pub fn new(children: Vec<NodeId>) -> Self {
        Self::with_mode(children, ParallelMode::default())
    }

    pub fn with_mode(children: Vec<NodeId>, mode: ParallelMode) -> Self {
        Self { children, mode }
    }

    pub fn mode(&self) -> ParallelMode {
        self.mode
    }

    fn evaluate<C>(&self, ctx: &Context<'_, C>) -> Status {
        let mut succeeded = 0usize;
        let mut failed = 0usize;
        let mut first_completed = None;

        for &child in &self.children {
            let status = child_outcome(ctx, child);
            match status {
                Status::Success => succeeded += 1,
                Status::Failure => failed += 1,
                _ => continue,
            }
            first_completed.get_or_insert(status);
        }
        let pending = self.children.len() - succeeded - failed;

        match self.mode {
            ParallelMode::All if pending > 0 => Status::Waiting,
            ParallelMode::All if failed > 0 => Status::Failure,
            ParallelMode::All => Status::Success,

            ParallelMode::UntilAnySucceeds if succeeded > 0 => Status::Success,
            ParallelMode::UntilAnySucceeds if pending > 0 => Status::Waiting,
            ParallelMode::UntilAnySucceeds if failed > 0 => Status::Failure,
            ParallelMode::UntilAnySucceeds => Status::Success,

            ParallelMode::UntilAnyFails if failed > 0 => Status::Failure,
            ParallelMode::UntilAnyFails if pending > 0 => Status::Waiting,
            ParallelMode::UntilAnyFails => Status::Success,

            ParallelMode::UntilAnyCompletes => match first_completed {
                Some(status) => status,
                None if pending > 0 => Status::Waiting,
                None => Status::Success,
            },
        }
    }
}

impl<C> Node<C> for Parallel {
    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        for &child in &self.children {
            ctx.start_node(child);
        }
        self.evaluate(ctx)
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        self.evaluate(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Graph, Wait};

    struct TestContext {
        value: i32,
    }

    fn increment() -> Action<TestContext, impl FnMut(&mut Context<'_, TestContext>) -> Status + Send>
    {
        Action::new(|ctx: &mut Context<'_, TestContext>| {
            ctx.blackboard_mut().value += 1;
            Status::Success
        })
    }

    fn fail_always()
    -> Action<TestContext, impl FnMut(&mut Context<'_, TestContext>) -> Status + Send> {
        Action::new(|_ctx: &mut Context<'_, TestContext>| Status::Failure)
    }

    #[test]
    fn sequence_all_success() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let a = builder.add(increment());
        let b = builder.add(increment());
        builder.add(Sequence::new(vec![a, b]));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start(), Status::Success);
        assert_eq!(graph.blackboard().value, 2);
    }

    #[test]
    fn sequence_fails_on_first_failure() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let a = builder.add(increment());
        let b = builder.add(fail_always());
        let c = builder.add(increment()); // Should not execute
        builder.add(Sequence::new(vec![a, b, c]));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start(), Status::Failure);
        assert_eq!(graph.blackboard().value, 1);
        assert_eq!(graph.status(c), Status::Uninitialized);
    }

    #[test]
    fn sequence_waits_on_running_child() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let wait = builder.add(Wait::new(1.0));
        let after = builder.add(increment());
        builder.add(Sequence::new(vec![wait, after]));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start(), Status::Waiting);
        // The wait completes on this tick; the sequence notices on the next.
        assert_eq!(graph.advance(1.0), Status::Waiting);
        assert_eq!(graph.advance(1.0), Status::Success);
        assert_eq!(graph.blackboard().value, 1);
    }

    #[test]
    fn selector_succeeds_on_first_success() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let a = builder.add(fail_always());
        let b = builder.add(increment());
        let c = builder.add(increment()); // Should not execute
        builder.add(Selector::new(vec![a, b, c]));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start(), Status::Success);
        assert_eq!(graph.blackboard().value, 1);
    }

    #[test]
    fn selector_fails_when_all_fail() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let a = builder.add(fail_always());
        let b = builder.add(fail_always());
        builder.add(Selector::new(vec![a, b]));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start(), Status::Failure);
    }

    #[test]
    fn parallel_all_waits_for_slowest_child() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let short = builder.add(Wait::new(1.0));
        let long = builder.add(Wait::new(2.0));
        builder.add(Parallel::new(vec![short, long]));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start(), Status::Waiting);
        assert_eq!(graph.advance(1.0), Status::Waiting);
        assert_eq!(graph.advance(1.0), Status::Waiting);
        assert_eq!(graph.advance(1.0), Status::Success);
    }

    #[test]
    fn parallel_until_any_fails_cancels_siblings() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let long = builder.add(Wait::new(10.0));
        let fail = builder.add(fail_always());
        builder.add(Parallel::with_mode(
            vec![long, fail],
            ParallelMode::UntilAnyFails,
        ));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start(), Status::Failure);
        assert_eq!(graph.status(long), Status::Uninitialized);
        assert!(graph.active_nodes().is_empty());
    }

    #[test]
    fn parallel_until_any_completes_mirrors_first_child() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let long = builder.add(Wait::new(10.0));
        let quick = builder.add(increment());
        builder.add(Parallel::with_mode(
            vec![long, quick],
            ParallelMode::UntilAnyCompletes,
        ));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start(), Status::Success);
    }

    #[test]
    fn empty_composites_resolve_immediately() {
        let mut builder = Graph::builder(TestContext { value: 0 });
        let seq = builder.add(Sequence::new(Vec::new()));
        let sel = builder.add(Selector::new(Vec::new()));
        let par = builder.add(Parallel::new(Vec::new()));
        let mut graph = builder.build().unwrap();

        assert_eq!(graph.start_node(seq), Status::Success);
        assert_eq!(graph.start_node(sel), Status::Failure);
        assert_eq!(graph.start_node(par), Status::Success);
    }
}
