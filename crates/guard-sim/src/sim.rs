//! Fixed-step simulation loop over the guard graph.

use std::fmt;

use behavior_graph::{Graph, GraphSnapshot, Status};
use serde::Serialize;
use tracing::info;

use crate::config::SimConfig;
use crate::tree::build_guard_graph;
use crate::world::{EventKind, World};

pub struct Simulation {
    graph: Graph<World>,
    delta: f32,
    previous: GraphSnapshot,
}

/// Outcome of a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub ticks: u64,
    pub elapsed: f64,
    pub root: Status,
    pub guard_position: f32,
    pub waypoints_reached: usize,
    pub sweeps_clear: usize,
    pub spotted_at: Option<u64>,
    pub captured_at: Option<u64>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks:             {} ({:.1}s)", self.ticks, self.elapsed)?;
        writeln!(f, "root status:       {}", self.root)?;
        writeln!(f, "guard position:    {:.2}", self.guard_position)?;
        writeln!(f, "waypoints reached: {}", self.waypoints_reached)?;
        writeln!(f, "sweeps clear:      {}", self.sweeps_clear)?;
        match self.captured_at {
            Some(tick) => write!(f, "intruder:          captured at tick {tick}"),
            None if self.spotted_at.is_some() => write!(f, "intruder:          escaped"),
            None => write!(f, "intruder:          never seen"),
        }
    }
}

impl Simulation {
    pub fn new(config: &SimConfig) -> anyhow::Result<Self> {
        let graph = build_guard_graph(World::new(config.intruder_tick), config.seed)?;
        let previous = graph.snapshot();
        Ok(Self {
            graph,
            delta: config.delta,
            previous,
        })
    }

    pub fn graph(&self) -> &Graph<World> {
        &self.graph
    }

    pub fn world(&self) -> &World {
        self.graph.blackboard()
    }

    /// Starts the root. Returns the snapshot taken afterwards.
    pub fn start(&mut self) -> &GraphSnapshot {
        self.graph.start();
        self.record_transitions()
    }

    /// Moves the world, advances the graph by one tick and logs every status
    /// transition. Returns the snapshot taken afterwards.
    pub fn step(&mut self) -> &GraphSnapshot {
        let tick = self.graph.clock().tick() + 1;
        self.graph.blackboard_mut().step(tick, self.delta);
        self.graph.advance(self.delta);
        self.record_transitions()
    }

    fn record_transitions(&mut self) -> &GraphSnapshot {
        let snapshot = self.graph.snapshot();
        let tick = snapshot.clock.tick();
        for (node, before) in snapshot.changes_since(&self.previous) {
            info!(
                tick,
                node = %node.id,
                label = %node.label,
                from = %before,
                to = %node.status,
                "transition"
            );
        }
        self.previous = snapshot;
        &self.previous
    }

    pub fn summary(&self) -> Summary {
        let clock = self.graph.clock();
        let world = self.world();
        Summary {
            ticks: clock.tick(),
            elapsed: clock.elapsed(),
            root: self.graph.status(self.graph.root()),
            guard_position: world.guard,
            waypoints_reached: world.count(EventKind::WaypointReached),
            sweeps_clear: world.count(EventKind::AreaClear),
            spotted_at: world.first(EventKind::IntruderSpotted).map(|e| e.tick),
            captured_at: world.first(EventKind::IntruderCaptured).map(|e| e.tick),
        }
    }

    /// Ends the graph, tearing down whatever is still running.
    pub fn finish(&mut self) -> Summary {
        let summary = self.summary();
        self.graph.end();
        summary
    }
}
