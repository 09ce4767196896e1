//! Node identifiers for canonical and positioned trees.
//!
//! A [`NodeId`] is an index into a tree's node arena. Ids are assigned by the
//! tree builder in insertion order, which for every builder in this workspace
//! is pre-order, so two trees with the same shape carry the same ids.

use std::fmt;

/// Identifier of a node, unique within one tree.
///
/// Ids are never taken from input payloads. They are only meaningful for
/// the tree that issued them.
///
/// # Examples
///
/// ```
/// use mindmap_core::identifier::NodeId;
///
/// let root = NodeId::ROOT;
/// assert_eq!(root.index(), 0);
/// assert_eq!(root.to_string(), "n0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The id every tree assigns to its root.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in its tree's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}
