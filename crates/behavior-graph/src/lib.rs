//! Tick-driven behavior graph runtime.
//!
//! This library executes behavior graphs: trees of nodes whose leaves may be
//! shared through join nodes. Execution is single-threaded and cooperative:
//! the embedding application calls [`Graph::advance`] once per frame and
//! nodes suspend across frames by reporting `Running` or `Waiting`.
//!
//! - **Arena of nodes**: nodes are addressed by [`NodeId`]; parents hold
//!   child ids, joins see their parents as non-owning ids
//! - **Single mutator**: only the [`Graph`] records node status, through the
//!   start/update/end lifecycle of [`Node`]
//! - **No errors at runtime**: misconfiguration resolves to
//!   [`Status::Failure`] and is logged through `tracing`
//!
//! # Architecture
//!
//! - [`Node`]: core trait for all nodes, generic over a blackboard `C`
//! - [`Condition`]: stateful predicates used by [`Abort`], [`Restart`] and
//!   [`ConditionalGuard`]
//! - Composite nodes: [`Sequence`], [`Selector`], [`Parallel`]
//! - Decorator nodes: [`Inverter`], [`AlwaysSucceed`], [`Repeat`]
//! - Join nodes: [`WaitForAny`], [`WaitForAll`]
//! - Leaf nodes: [`Wait`], [`WaitRange`], [`Action`]

pub mod builder;
pub mod clock;
pub mod composite;
pub mod condition;
pub mod context;
pub mod decorator;
pub mod error;
pub mod graph;
pub mod id;
pub mod join;
pub mod leaf;
pub mod modifier;
pub mod node;
pub mod snapshot;
pub mod status;

// Re-export core types for ergonomic API
pub use builder::GraphBuilder;
pub use clock::Clock;
pub use composite::{Parallel, ParallelMode, Selector, Sequence};
pub use condition::{Condition, ConditionSet, Predicate, check_conditions};
pub use context::Context;
pub use decorator::{AlwaysSucceed, Inverter, Repeat};
pub use error::{GraphError, Result};
pub use graph::Graph;
pub use id::NodeId;
pub use join::{WaitForAll, WaitForAny};
pub use leaf::{Action, ConditionalGuard, Wait, WaitRange};
pub use modifier::{Abort, Restart};
pub use node::Node;
pub use snapshot::{GraphSnapshot, NodeSnapshot};
pub use status::Status;
