#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use behavior_graph::{Condition, Context, Node, Status};

/// Blackboard shared by the integration tests.
#[derive(Debug, Default)]
pub struct Board {
    pub trigger: bool,
    pub events: Vec<String>,
}

impl Board {
    pub fn count(&self, event: &str) -> usize {
        self.events.iter().filter(|e| e.as_str() == event).count()
    }
}

/// Leaf that records its lifecycle calls and returns scripted statuses.
pub struct Probe {
    name: &'static str,
    start: Status,
    update: Status,
}

impl Probe {
    pub fn new(name: &'static str, start: Status, update: Status) -> Self {
        Self {
            name,
            start,
            update,
        }
    }

    /// Runs until ended.
    pub fn running(name: &'static str) -> Self {
        Self::new(name, Status::Running, Status::Running)
    }

    /// Succeeds on start.
    pub fn succeeding(name: &'static str) -> Self {
        Self::new(name, Status::Success, Status::Success)
    }

    /// Runs for one tick, then succeeds.
    pub fn one_tick(name: &'static str) -> Self {
        Self::new(name, Status::Running, Status::Success)
    }
}

impl Node<Board> for Probe {
    fn on_start(&mut self, ctx: &mut Context<'_, Board>) -> Status {
        ctx.blackboard_mut().events.push(format!("{}:start", self.name));
        self.start
    }

    fn on_update(&mut self, ctx: &mut Context<'_, Board>) -> Status {
        ctx.blackboard_mut().events.push(format!("{}:update", self.name));
        self.update
    }

    fn on_end(&mut self, ctx: &mut Context<'_, Board>) {
        ctx.blackboard_mut().events.push(format!("{}:end", self.name));
    }
}

/// Condition reading `Board::trigger` and counting its setup/teardown.
#[derive(Clone, Default)]
pub struct Trigger {
    pub setups: Arc<AtomicUsize>,
    pub teardowns: Arc<AtomicUsize>,
}

impl Trigger {
    pub fn setups(&self) -> usize {
        self.setups.load(Ordering::SeqCst)
    }

    pub fn teardowns(&self) -> usize {
        self.teardowns.load(Ordering::SeqCst)
    }
}

impl Condition<Board> for Trigger {
    fn on_start(&mut self, _ctx: &Context<'_, Board>) {
        self.setups.fetch_add(1, Ordering::SeqCst);
    }

    fn evaluate(&mut self, ctx: &Context<'_, Board>) -> bool {
        ctx.blackboard().trigger
    }

    fn on_end(&mut self, _ctx: &Context<'_, Board>) {
        self.teardowns.fetch_add(1, Ordering::SeqCst);
    }
}
