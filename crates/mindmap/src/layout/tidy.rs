//! Leaf-slot assignment for the tidy-tree layout.
//!
//! Leaves get consecutive unit slots in reading order and every internal
//! node sits halfway between the slots of its first and last child. Because
//! each subtree covers a contiguous run of leaf slots, siblings always end
//! up in strictly increasing slot order.

use mindmap_core::tree::CanonicalTree;

/// Sibling-axis slots of every node, indexed by node id.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Slots {
    slots: Vec<f32>,
    leaves: usize,
}

impl Slots {
    /// Assign slots with a single post-order pass.
    pub(super) fn assign(tree: &CanonicalTree) -> Self {
        let mut slots = vec![0.0; tree.node_count()];
        let mut leaves = 0;

        for node in tree.iter_post_order() {
            let slot = match (node.children().first(), node.children().last()) {
                (Some(first), Some(last)) => (slots[first.index()] + slots[last.index()]) / 2.0,
                _ => {
                    leaves += 1;
                    (leaves - 1) as f32
                }
            };
            slots[node.id().index()] = slot;
        }

        Self { slots, leaves }
    }

    pub(super) fn get(&self, index: usize) -> f32 {
        self.slots[index]
    }

    pub(super) fn leaves(&self) -> usize {
        self.leaves
    }
}
