//! Conditions: stateful predicates owned by modifier and guard nodes.
//!
//! A condition's setup and teardown are tied to its owner's activation:
//! [`ConditionSet::start`] runs when the owner starts and
//! [`ConditionSet::end`] when it ends, never twice in a row.

use core::marker::PhantomData;

use crate::Context;

/// A boolean predicate with an optional per-activation lifecycle.
pub trait Condition<C>: Send {
    /// Prepares per-activation state.
    fn on_start(&mut self, _ctx: &Context<'_, C>) {}

    /// Evaluates the predicate.
    fn evaluate(&mut self, ctx: &Context<'_, C>) -> bool;

    /// Releases per-activation state.
    fn on_end(&mut self, _ctx: &Context<'_, C>) {}
}

impl<C> Condition<C> for Box<dyn Condition<C>> {
    #[inline]
    fn on_start(&mut self, ctx: &Context<'_, C>) {
        (**self).on_start(ctx)
    }

    #[inline]
    fn evaluate(&mut self, ctx: &Context<'_, C>) -> bool {
        (**self).evaluate(ctx)
    }

    #[inline]
    fn on_end(&mut self, ctx: &Context<'_, C>) {
        (**self).on_end(ctx)
    }
}

/// Stateless condition backed by a closure over the blackboard.
///
/// # Example
///
/// ```rust,ignore
/// let low_health = Predicate::new(|world: &World| world.health < 20);
/// ```
pub struct Predicate<C, F> {
    check: F,
    _blackboard: PhantomData<fn(&C)>,
}

impl<C, F> Predicate<C, F>
where
    F: FnMut(&C) -> bool + Send,
{
    pub fn new(check: F) -> Self {
        Self {
            check,
            _blackboard: PhantomData,
        }
    }
}

impl<C, F> Condition<C> for Predicate<C, F>
where
    F: FnMut(&C) -> bool + Send,
{
    fn evaluate(&mut self, ctx: &Context<'_, C>) -> bool {
        (self.check)(ctx.blackboard())
    }
}

/// Aggregates a list of conditions.
///
/// With `requires_all` the result is true iff every condition holds (AND);
/// otherwise iff at least one holds (OR). Evaluation stops at the first
/// condition that decides the result.
///
/// An empty list is never satisfied, under either mode.
pub fn check_conditions<C>(
    conditions: &mut [Box<dyn Condition<C>>],
    requires_all: bool,
    ctx: &Context<'_, C>,
) -> bool {
    if conditions.is_empty() {
        return false;
    }

    if requires_all {
        conditions.iter_mut().all(|condition| condition.evaluate(ctx))
    } else {
        conditions.iter_mut().any(|condition| condition.evaluate(ctx))
    }
}

/// The condition list of a modifier or guard, with its AND/OR flag and
/// lifecycle bookkeeping.
pub struct ConditionSet<C> {
    conditions: Vec<Box<dyn Condition<C>>>,
    requires_all: bool,
    started: bool,
}

impl<C> Default for ConditionSet<C> {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            requires_all: false,
            started: false,
        }
    }
}

impl<C> ConditionSet<C> {
    pub fn new(requires_all: bool) -> Self {
        Self {
            requires_all,
            ..Self::default()
        }
    }

    pub fn push<K>(&mut self, condition: K)
    where
        K: Condition<C> + 'static,
    {
        self.conditions.push(Box::new(condition));
    }

    pub fn set_requires_all(&mut self, requires_all: bool) {
        self.requires_all = requires_all;
    }

    pub fn requires_all(&self) -> bool {
        self.requires_all
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Whether setup ran without a matching teardown yet.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Runs every condition's setup. A no-op if already started.
    pub fn start(&mut self, ctx: &Context<'_, C>) {
        if self.started {
            return;
        }
        for condition in &mut self.conditions {
            condition.on_start(ctx);
        }
        self.started = true;
    }

    /// Runs every condition's teardown. A no-op unless started.
    pub fn end(&mut self, ctx: &Context<'_, C>) {
        if !self.started {
            return;
        }
        for condition in &mut self.conditions {
            condition.on_end(ctx);
        }
        self.started = false;
    }

    /// Tears down and sets up again, discarding per-activation state.
    pub fn restart(&mut self, ctx: &Context<'_, C>) {
        self.end(ctx);
        self.start(ctx);
    }

    pub fn check(&mut self, ctx: &Context<'_, C>) -> bool {
        check_conditions(&mut self.conditions, self.requires_all, ctx)
    }
}
