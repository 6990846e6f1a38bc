//! The guard's world: a one-dimensional corridor with patrol waypoints and
//! at most one intruder.
//!
//! The world is the blackboard of the guard graph. Actions move the guard and
//! record events; the simulation loop moves the intruder before every tick.

use strum::Display;

/// Corridor spans `0.0..=CORRIDOR_LENGTH`.
pub const CORRIDOR_LENGTH: f32 = 20.0;
pub const WAYPOINTS: [f32; 3] = [2.0, 10.0, 18.0];
pub const GUARD_SPEED: f32 = 2.0;
pub const SIGHT_RANGE: f32 = 6.0;
pub const REACH: f32 = 0.5;
pub const INTRUDER_SPAWN: f32 = 16.0;
pub const INTRUDER_SPEED: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    WaypointReached,
    AreaClear,
    IntruderAppeared,
    IntruderSpotted,
    IntruderLost,
    IntruderCaptured,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Event {
    pub tick: u64,
    pub kind: EventKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intruder {
    pub position: f32,
    pub captured: bool,
}

#[derive(Debug)]
pub struct World {
    pub guard: f32,
    pub next_waypoint: usize,
    pub intruder: Option<Intruder>,
    intruder_tick: Option<u64>,
    was_visible: bool,
    events: Vec<Event>,
}

impl World {
    pub fn new(intruder_tick: Option<u64>) -> Self {
        Self {
            guard: 0.0,
            next_waypoint: 0,
            intruder: None,
            intruder_tick,
            was_visible: false,
            events: Vec::new(),
        }
    }

    /// Advances everything the graph does not control: the intruder appears
    /// on its tick and then backs away from the guard.
    pub fn step(&mut self, tick: u64, delta: f32) {
        if self.intruder.is_none() && self.intruder_tick.is_some_and(|at| tick >= at) {
            self.intruder = Some(Intruder {
                position: INTRUDER_SPAWN,
                captured: false,
            });
            self.record(tick, EventKind::IntruderAppeared);
        }

        let guard = self.guard;
        if let Some(intruder) = self.intruder.as_mut().filter(|i| !i.captured) {
            let away = if intruder.position >= guard { 1.0 } else { -1.0 };
            intruder.position =
                (intruder.position + away * INTRUDER_SPEED * delta).clamp(0.0, CORRIDOR_LENGTH);
        }

        let visible = self.intruder_visible();
        if visible != self.was_visible {
            let kind = if visible {
                EventKind::IntruderSpotted
            } else {
                EventKind::IntruderLost
            };
            // A capture already explains the loss of sight.
            if visible || !self.intruder.is_some_and(|i| i.captured) {
                self.record(tick, kind);
            }
            self.was_visible = visible;
        }
    }

    /// An uncaptured intruder within sight range of the guard.
    pub fn intruder_visible(&self) -> bool {
        self.intruder
            .is_some_and(|i| !i.captured && (i.position - self.guard).abs() <= SIGHT_RANGE)
    }

    pub fn waypoint(&self) -> f32 {
        WAYPOINTS[self.next_waypoint % WAYPOINTS.len()]
    }

    pub fn advance_waypoint(&mut self) {
        self.next_waypoint = (self.next_waypoint + 1) % WAYPOINTS.len();
    }

    /// Moves the guard toward `target` by at most `GUARD_SPEED * delta`.
    /// Returns whether the guard is within reach of the target afterwards.
    pub fn move_guard(&mut self, target: f32, delta: f32) -> bool {
        let offset = target - self.guard;
        let max_step = GUARD_SPEED * delta;
        self.guard = if offset.abs() <= max_step {
            target
        } else {
            self.guard + max_step.copysign(offset)
        };
        self.guard = self.guard.clamp(0.0, CORRIDOR_LENGTH);
        (target - self.guard).abs() <= REACH
    }

    /// Captures the intruder if it is within reach.
    pub fn capture(&mut self, tick: u64) -> bool {
        let guard = self.guard;
        let Some(intruder) = self
            .intruder
            .as_mut()
            .filter(|i| !i.captured && (i.position - guard).abs() <= REACH)
        else {
            return false;
        };
        intruder.captured = true;
        self.record(tick, EventKind::IntruderCaptured);
        true
    }

    pub fn record(&mut self, tick: u64, kind: EventKind) {
        tracing::info!(tick, event = %kind, position = self.guard, "world event");
        self.events.push(Event { tick, kind });
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn first(&self, kind: EventKind) -> Option<&Event> {
        self.events.iter().find(|e| e.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_moves_at_bounded_speed_and_snaps_to_target() {
        let mut world = World::new(None);
        assert!(!world.move_guard(2.0, 0.5));
        assert_eq!(world.guard, 1.0);
        assert!(world.move_guard(2.0, 0.5));
        assert_eq!(world.guard, 2.0);
    }

    #[test]
    fn intruder_appears_on_its_tick_and_backs_away() {
        let mut world = World::new(Some(3));
        world.step(2, 0.1);
        assert!(world.intruder.is_none());

        world.step(3, 0.1);
        let position = world.intruder.map(|i| i.position);
        assert!(position.is_some_and(|p| p > INTRUDER_SPAWN));
        assert_eq!(world.count(EventKind::IntruderAppeared), 1);
        assert!(!world.intruder_visible());
    }

    #[test]
    fn spotting_and_capture_are_recorded() {
        let mut world = World::new(Some(0));
        world.guard = INTRUDER_SPAWN - 1.0;
        world.step(0, 0.0);
        assert!(world.intruder_visible());
        assert_eq!(world.count(EventKind::IntruderSpotted), 1);

        assert!(!world.capture(1));
        world.guard = INTRUDER_SPAWN;
        assert!(world.capture(1));
        world.step(2, 0.1);

        assert!(!world.intruder_visible());
        assert_eq!(world.count(EventKind::IntruderCaptured), 1);
        assert_eq!(world.count(EventKind::IntruderLost), 0);
    }
}
