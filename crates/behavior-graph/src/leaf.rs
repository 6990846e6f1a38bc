//! Leaf nodes: timed waits, closure actions and condition guards.

use core::marker::PhantomData;

use rand::Rng;

use crate::{Condition, ConditionSet, Context, Node, Status};

/// Counts down a fixed number of seconds.
///
/// The countdown is armed on every start, so a restarted wait never
/// inherits time from a previous activation. A non-positive duration
/// succeeds on start.
pub struct Wait {
    duration: f32,
    remaining: f32,
}

impl Wait {
    pub fn new(seconds: f32) -> Self {
        Self {
            duration: seconds,
            remaining: 0.0,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds left in the current activation.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl<C> Node<C> for Wait {
    fn on_start(&mut self, _ctx: &mut Context<'_, C>) -> Status {
        self.remaining = self.duration;
        countdown_status(self.remaining)
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        self.remaining -= ctx.delta_time();
        countdown_status(self.remaining)
    }

    fn on_end(&mut self, _ctx: &mut Context<'_, C>) {
        self.remaining = 0.0;
    }
}

/// Waits for a duration drawn uniformly from `min..=max` on every start.
///
/// Draws come from the graph's seeded generator (see
/// [`GraphBuilder::with_seed`](crate::GraphBuilder::with_seed)), so runs are
/// reproducible. Bounds given in the wrong order are swapped.
pub struct WaitRange {
    min: f32,
    max: f32,
    remaining: f32,
}

impl WaitRange {
    pub fn new(min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            remaining: 0.0,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Draws a duration, or `None` when a bound is NaN or the lower bound
    /// is negative infinity. An infinite upper bound waits until the node is
    /// ended.
    fn sample<C>(&self, ctx: &mut Context<'_, C>) -> Option<f32> {
        if self.min.is_nan() || self.max.is_nan() {
            return None;
        }
        if self.max == f32::INFINITY {
            return Some(f32::INFINITY);
        }
        if !self.min.is_finite() {
            return None;
        }
        if self.max <= self.min {
            return Some(self.min);
        }
        // Interpolating keeps spans wider than f32::MAX finite.
        let t: f32 = ctx.rng().gen_range(0.0..=1.0);
        Some((self.min * (1.0 - t) + self.max * t).clamp(self.min, self.max))
    }
}

impl<C> Node<C> for WaitRange {
    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        let Some(remaining) = self.sample(ctx) else {
            ctx.log_failure(format_args!(
                "wait range {}..={} cannot be sampled",
                self.min, self.max
            ));
            self.remaining = 0.0;
            return Status::Failure;
        };
        self.remaining = remaining;
        countdown_status(self.remaining)
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        self.remaining -= ctx.delta_time();
        countdown_status(self.remaining)
    }

    fn on_end(&mut self, _ctx: &mut Context<'_, C>) {
        self.remaining = 0.0;
    }
}

fn countdown_status(remaining: f32) -> Status {
    if remaining > 0.0 {
        Status::Running
    } else {
        Status::Success
    }
}

/// Leaf backed by a closure, evaluated on start and on every update.
///
/// # Example
///
/// ```rust,ignore
/// let step = builder.add(Action::new(|ctx: &mut Context<'_, World>| {
///     ctx.blackboard_mut().guard.step_toward_target()
/// }));
/// ```
pub struct Action<C, F> {
    run: F,
    _blackboard: PhantomData<fn(&mut C)>,
}

impl<C, F> Action<C, F>
where
    F: FnMut(&mut Context<'_, C>) -> Status + Send,
{
    pub fn new(run: F) -> Self {
        Self {
            run,
            _blackboard: PhantomData,
        }
    }
}

impl<C, F> Node<C> for Action<C, F>
where
    F: FnMut(&mut Context<'_, C>) -> Status + Send,
{
    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        (self.run)(ctx)
    }

    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        (self.run)(ctx)
    }
}

/// Checks its conditions once on start: `Success` if they hold, `Failure`
/// otherwise.
///
/// An empty condition list never holds, so an empty guard always fails.
pub struct ConditionalGuard<C> {
    conditions: ConditionSet<C>,
}

impl<C> ConditionalGuard<C> {
    /// A guard combining its conditions with AND (`true`) or OR (`false`).
    pub fn new(requires_all: bool) -> Self {
        Self {
            conditions: ConditionSet::new(requires_all),
        }
    }

    pub fn with_condition<K>(mut self, condition: K) -> Self
    where
        K: Condition<C> + 'static,
    {
        self.conditions.push(condition);
        self
    }
}

impl<C> Node<C> for ConditionalGuard<C> {
    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        if self.conditions.is_empty() {
            ctx.log_failure("guard has no conditions");
            return Status::Failure;
        }

        self.conditions.start(ctx);
        if self.conditions.check(ctx) {
            Status::Success
        } else {
            Status::Failure
        }
    }

    fn on_end(&mut self, ctx: &mut Context<'_, C>) {
        self.conditions.end(ctx);
    }
}
