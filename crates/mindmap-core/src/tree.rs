//! The canonical tree: the single, shape-independent hierarchy model.
//!
//! Every payload shape is normalized into a [`CanonicalTree`] before layout,
//! so nothing downstream needs to know where a tree came from.
//!
//! # Architecture
//!
//! Nodes live in an arena (`Vec<CanonicalNode>`) indexed by [`NodeId`].
//! Each node stores its parent and its ordered child ids. The only way to
//! grow a tree is [`TreeBuilder::add_child`], which attaches a new node to an
//! existing one, so the structural invariants hold by construction:
//!
//! - exactly one root, at [`NodeId::ROOT`];
//! - every other node has exactly one parent;
//! - `child.depth == parent.depth + 1`;
//! - no cycles.
//!
//! Traversals ([`CanonicalTree::iter_pre_order`],
//! [`CanonicalTree::iter_post_order`]) are iterative, so deeply nested
//! outlines do not exhaust the call stack.

use log::trace;

use crate::identifier::NodeId;

/// A node of a [`CanonicalTree`].
#[derive(Debug, Clone)]
pub struct CanonicalNode {
    id: NodeId,
    label: String,
    depth: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl CanonicalNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display text of the node.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Distance from the root; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Parent id, `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in reading order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A normalized, ordered tree of labelled nodes.
///
/// Equality is structural: two trees are equal when they have the same
/// shape, the same labels and the same child order, regardless of the order
/// in which their nodes were inserted.
///
/// # Examples
///
/// ```
/// use mindmap_core::tree::TreeBuilder;
///
/// let mut builder = TreeBuilder::new("Root");
/// let a = builder.add_child(builder.root(), "A");
/// builder.add_child(a, "x");
/// builder.add_child(builder.root(), "B");
/// let tree = builder.build();
///
/// assert_eq!(tree.node_count(), 4);
/// assert_eq!(tree.max_depth(), 2);
/// let labels: Vec<_> = tree.iter_pre_order().map(|n| n.label()).collect();
/// assert_eq!(labels, ["Root", "A", "x", "B"]);
/// ```
#[derive(Debug, Clone)]
pub struct CanonicalTree {
    nodes: Vec<CanonicalNode>,
}

impl CanonicalTree {
    /// Creates a tree consisting of a single root node.
    pub fn leaf(label: impl Into<String>) -> Self {
        TreeBuilder::new(label).build()
    }

    /// Returns the root node.
    pub fn root(&self) -> &CanonicalNode {
        &self.nodes[NodeId::ROOT.index()]
    }

    /// Returns the node with the given id, if this tree issued it.
    pub fn node(&self, id: NodeId) -> Option<&CanonicalNode> {
        self.nodes.get(id.index())
    }

    /// Returns an iterator over the children of `id` in reading order.
    ///
    /// Unknown ids yield an empty iterator.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &CanonicalNode> {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.children.iter())
            .map(|child| &self.nodes[child.index()])
    }

    /// Returns an iterator over all nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &CanonicalNode> {
        self.nodes.iter()
    }

    /// Total number of nodes, root included. Never zero.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node.
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Number of nodes without children.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Iterates nodes in pre-order (parent before children, children in
    /// reading order).
    pub fn iter_pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![NodeId::ROOT],
        }
    }

    /// Iterates nodes in post-order (children, in reading order, before
    /// their parent).
    pub fn iter_post_order(&self) -> PostOrder<'_> {
        PostOrder {
            tree: self,
            stack: vec![(NodeId::ROOT, 0)],
        }
    }

    /// Builds a new tree without the nodes deeper than `max_depth`.
    ///
    /// The result is rebuilt from scratch, so ids are reassigned.
    /// `truncated(0)` keeps only the root.
    pub fn truncated(&self, max_depth: usize) -> CanonicalTree {
        let mut builder = TreeBuilder::new(self.root().label.clone());
        let mut mapping = vec![None; self.nodes.len()];
        mapping[NodeId::ROOT.index()] = Some(builder.root());

        for node in self.iter_pre_order().skip(1) {
            if node.depth > max_depth {
                continue;
            }
            let parent = node
                .parent
                .and_then(|parent| mapping[parent.index()])
                .expect("pre-order visits parents before children");
            mapping[node.id.index()] = Some(builder.add_child(parent, node.label.clone()));
        }

        let tree = builder.build();
        trace!(
            max_depth,
            before = self.node_count(),
            after = tree.node_count();
            "Truncated tree"
        );
        tree
    }

    /// Renders the tree as an indented markdown list, one node per line.
    ///
    /// The output parses back into an equal tree as long as labels are
    /// single-line and non-empty.
    pub fn to_outline(&self) -> String {
        let mut out = String::new();
        for node in self.iter_pre_order() {
            out.push_str(&"  ".repeat(node.depth));
            out.push_str("- ");
            out.push_str(&node.label);
            out.push('\n');
        }
        out
    }
}

impl PartialEq for CanonicalTree {
    fn eq(&self, other: &Self) -> bool {
        // Ordered trees are equal exactly when their pre-order sequences of
        // (label, child count) are equal.
        self.node_count() == other.node_count()
            && self
                .iter_pre_order()
                .zip(other.iter_pre_order())
                .all(|(a, b)| a.label == b.label && a.children.len() == b.children.len())
    }
}

impl Eq for CanonicalTree {}

/// Pre-order iterator returned by [`CanonicalTree::iter_pre_order`].
#[derive(Debug)]
pub struct PreOrder<'a> {
    tree: &'a CanonicalTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a CanonicalNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id.index()];
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Post-order iterator returned by [`CanonicalTree::iter_post_order`].
#[derive(Debug)]
pub struct PostOrder<'a> {
    tree: &'a CanonicalTree,
    /// Pending nodes with the index of the next child to descend into.
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Iterator for PostOrder<'a> {
    type Item = &'a CanonicalNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, next_child) = self.stack.last_mut()?;
            let node = &self.tree.nodes[id.index()];
            if let Some(&child) = node.children.get(*next_child) {
                *next_child += 1;
                self.stack.push((child, 0));
            } else {
                self.stack.pop();
                return Some(node);
            }
        }
    }
}

/// Incremental constructor for [`CanonicalTree`].
///
/// Ids are issued in insertion order, starting with the root.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    nodes: Vec<CanonicalNode>,
}

impl TreeBuilder {
    /// Starts a tree whose root carries `root_label`.
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            nodes: vec![CanonicalNode {
                id: NodeId::ROOT,
                label: root_label.into(),
                depth: 0,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Id of the root node.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes added so far, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of a node already in the builder.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(id.index()).map(|node| node.depth)
    }

    /// Appends a new last child to `parent` and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not issued by this builder.
    pub fn add_child(&mut self, parent: NodeId, label: impl Into<String>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let parent_node = self
            .nodes
            .get_mut(parent.index())
            .unwrap_or_else(|| panic!("Adding child: parent {parent} does not exist"));
        parent_node.children.push(id);
        let depth = parent_node.depth + 1;

        self.nodes.push(CanonicalNode {
            id,
            label: label.into(),
            depth,
            parent: Some(parent),
            children: Vec::new(),
        });
        id
    }

    /// Finishes the tree.
    pub fn build(self) -> CanonicalTree {
        CanonicalTree { nodes: self.nodes }
    }
}
