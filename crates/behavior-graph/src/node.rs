//! Core node trait.
//!
//! This module defines the [`Node`] trait, the unit of behavior stored in a
//! [`Graph`](crate::Graph). The trait is generic over a blackboard type `C`
//! owned by the graph, which nodes read and write through [`Context`].
//!
//! Nodes never set their own status. The graph records whatever a hook
//! returns, and it alone decides when a node is updated or ended.

use crate::{Context, NodeId, Status};

/// A node of a behavior graph.
///
/// # Lifecycle
///
/// - [`on_start`](Node::on_start) runs when the node is activated. Returning a
///   terminal status completes the node immediately.
/// - [`on_update`](Node::on_update) runs once per tick while the node is
///   `Running` or `Waiting`.
/// - [`on_end`](Node::on_end) runs exactly once per activation, whether the
///   node completed or was cancelled. Per-activation state is reset here.
pub trait Node<C>: Send {
    /// Short name used in logs and snapshots.
    fn kind(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Children owned by this node, in evaluation order.
    fn children(&self) -> &[NodeId] {
        &[]
    }

    /// Activates the node.
    fn on_start(&mut self, _ctx: &mut Context<'_, C>) -> Status {
        Status::Running
    }

    /// Advances an active node by one tick.
    fn on_update(&mut self, _ctx: &mut Context<'_, C>) -> Status {
        Status::Success
    }

    /// Tears down the current activation.
    fn on_end(&mut self, _ctx: &mut Context<'_, C>) {}

    /// Join nodes accept a start from every parent while they are active.
    fn is_join(&self) -> bool {
        false
    }

    /// Whether parent activations are still outstanding.
    ///
    /// While this returns `true` the graph keeps the node alive after
    /// [`on_end`](Node::on_end) and refuses to reset its status.
    fn is_held(&self) -> bool {
        false
    }
}

/// Blanket implementation for boxed nodes.
///
/// This allows `Box<dyn Node<C>>` to also implement `Node<C>`, so prebuilt
/// subtrees can be passed around as trait objects and added to a builder.
impl<C> Node<C> for Box<dyn Node<C>> {
    #[inline]
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    #[inline]
    fn children(&self) -> &[NodeId] {
        (**self).children()
    }

    #[inline]
    fn on_start(&mut self, ctx: &mut Context<'_, C>) -> Status {
        (**self).on_start(ctx)
    }

    #[inline]
    fn on_update(&mut self, ctx: &mut Context<'_, C>) -> Status {
        (**self).on_update(ctx)
    }

    #[inline]
    fn on_end(&mut self, ctx: &mut Context<'_, C>) {
        (**self).on_end(ctx)
    }

    #[inline]
    fn is_join(&self) -> bool {
        (**self).is_join()
    }

    #[inline]
    fn is_held(&self) -> bool {
        (**self).is_held()
    }
}

/// Strips the module path and generic arguments from a type name.
fn short_type_name(name: &'static str) -> &'static str {
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}
