//! Arena handles for graph nodes.

use core::fmt;

/// Stable identity of a node inside one [`Graph`](crate::Graph).
///
/// Ids are indices into the graph's node arena, assigned by
/// [`GraphBuilder`](crate::GraphBuilder) in insertion order. They are only
/// meaningful for the builder that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena index of this node.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
