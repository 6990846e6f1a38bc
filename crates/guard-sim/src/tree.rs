//! The guard's behavior graph.
//!
//! ```text
//! repeat forever
//! └── selector
//!     ├── abort (intruder not visible)
//!     │   └── chase: guard visible → approach → apprehend
//!     └── abort (intruder visible)
//!         └── patrol: walk → sweep → pause → next waypoint
//!                           │
//!                           parallel
//!                           ├── scan left  ─┐
//!                           └── scan right ─┴── wait for all → report clear
//! ```

use behavior_graph::{
    Abort, Action, ConditionalGuard, Context, Graph, Parallel, Predicate, Repeat, Result,
    Selector, Sequence, Status, Wait, WaitForAll, WaitRange,
};

use crate::world::{EventKind, World};

const SCAN_LEFT_SECONDS: f32 = 0.4;
const SCAN_RIGHT_SECONDS: f32 = 0.8;
const PAUSE_SECONDS: (f32, f32) = (0.5, 1.5);

fn intruder_visible(world: &World) -> bool {
    world.intruder_visible()
}

fn intruder_hidden(world: &World) -> bool {
    !world.intruder_visible()
}

fn walk_to_waypoint(ctx: &mut Context<'_, World>) -> Status {
    let (tick, delta) = (ctx.tick(), ctx.delta_time());
    let world = ctx.blackboard_mut();
    let target = world.waypoint();
    if world.move_guard(target, delta) {
        world.record(tick, EventKind::WaypointReached);
        Status::Success
    } else {
        Status::Running
    }
}

fn next_waypoint(ctx: &mut Context<'_, World>) -> Status {
    ctx.blackboard_mut().advance_waypoint();
    Status::Success
}

fn report_clear(ctx: &mut Context<'_, World>) -> Status {
    let tick = ctx.tick();
    ctx.blackboard_mut().record(tick, EventKind::AreaClear);
    Status::Success
}

fn approach_intruder(ctx: &mut Context<'_, World>) -> Status {
    let delta = ctx.delta_time();
    let world = ctx.blackboard_mut();
    let Some(target) = world.intruder.filter(|i| !i.captured).map(|i| i.position) else {
        return Status::Failure;
    };
    if world.move_guard(target, delta) {
        Status::Success
    } else {
        Status::Running
    }
}

fn apprehend(ctx: &mut Context<'_, World>) -> Status {
    let tick = ctx.tick();
    if ctx.blackboard_mut().capture(tick) {
        Status::Success
    } else {
        ctx.log_failure("intruder slipped out of reach");
        Status::Failure
    }
}

/// Builds the patrol-and-chase graph around `world`.
pub fn build_guard_graph(world: World, seed: u64) -> Result<Graph<World>> {
    let mut builder = Graph::builder(world).with_seed(seed);

    // Chase branch.
    let spotted = builder.add_named(
        "intruder visible?",
        ConditionalGuard::new(true).with_condition(Predicate::new(intruder_visible)),
    );
    let approach = builder.add_named("approach intruder", Action::new(approach_intruder));
    let capture = builder.add_named("apprehend", Action::new(apprehend));
    let chase = builder.add_named("chase", Sequence::new(vec![spotted, approach, capture]));
    let chase_guard = builder.add_named(
        "chase unless lost",
        Abort::new(chase).with_condition(Predicate::new(intruder_hidden)),
    );

    // Sweep: both scans must finish before the area is reported clear.
    let clear = builder.add_named("report clear", Action::new(report_clear));
    let all_scanned = builder.add_named("all directions scanned", WaitForAll::new(clear));
    let look_left = builder.add_named("look left", Wait::new(SCAN_LEFT_SECONDS));
    let look_right = builder.add_named("look right", Wait::new(SCAN_RIGHT_SECONDS));
    let scan_left = builder.add_named("scan left", Sequence::new(vec![look_left, all_scanned]));
    let scan_right = builder.add_named("scan right", Sequence::new(vec![look_right, all_scanned]));
    let sweep = builder.add_named("sweep", Parallel::new(vec![scan_left, scan_right]));

    // Patrol branch.
    let walk = builder.add_named("walk to waypoint", Action::new(walk_to_waypoint));
    let pause = builder.add_named("pause", WaitRange::new(PAUSE_SECONDS.0, PAUSE_SECONDS.1));
    let advance = builder.add_named("next waypoint", Action::new(next_waypoint));
    let patrol = builder.add_named("patrol", Sequence::new(vec![walk, sweep, pause, advance]));
    let patrol_guard = builder.add_named(
        "patrol unless spotted",
        Abort::new(patrol).with_condition(Predicate::new(intruder_visible)),
    );

    let behave = builder.add_named("behave", Selector::new(vec![chase_guard, patrol_guard]));
    let root = builder.add_named("guard", Repeat::forever(behave));

    builder.with_root(root).build()
}
