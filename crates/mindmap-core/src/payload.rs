//! Raw hierarchy payloads as delivered by the summarization service.
//!
//! Over its lifetime the service answered in three incompatible shapes. They
//! are modelled as the variants of [`RawPayload`] and converge on
//! [`CanonicalTree`](crate::tree::CanonicalTree) during normalization.
//!
//! - [`RawPayload::DictOfLists`]: topic name → list of subtopic strings, in
//!   the order the upstream mapping listed them.
//! - [`RawPayload::ExplicitTree`]: a `{ name, children }` tree.
//! - [`RawPayload::OutlineText`]: heading/list/indentation delimited text.
//!
//! # Explicit trees
//!
//! [`ExplicitTree`] is an arena of named nodes where children are references
//! to other arena nodes. Upstream payloads are plain nested JSON, but the
//! arena keeps malformed inputs representable: a node may list itself as a
//! child, two nodes may share a child, and references may form a cycle.
//! Normalization is responsible for rejecting those shapes.

use std::fmt;

use indexmap::IndexMap;

/// Ordered mapping from topic to subtopics.
pub type DictOfLists = IndexMap<String, Vec<String>>;

/// One hierarchy payload, immutable once received.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    DictOfLists(DictOfLists),
    ExplicitTree(ExplicitTree),
    OutlineText(String),
}

impl RawPayload {
    /// Returns which shape this payload has.
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::DictOfLists(_) => PayloadKind::DictOfLists,
            Self::ExplicitTree(_) => PayloadKind::ExplicitTree,
            Self::OutlineText(_) => PayloadKind::OutlineText,
        }
    }
}

impl From<DictOfLists> for RawPayload {
    fn from(map: DictOfLists) -> Self {
        Self::DictOfLists(map)
    }
}

impl From<ExplicitTree> for RawPayload {
    fn from(tree: ExplicitTree) -> Self {
        Self::ExplicitTree(tree)
    }
}

/// Discriminant of [`RawPayload`], used for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    DictOfLists,
    ExplicitTree,
    OutlineText,
}

impl PayloadKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::DictOfLists => "dict-of-lists",
            Self::ExplicitTree => "explicit-tree",
            Self::OutlineText => "outline-text",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index of a node inside an [`ExplicitTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExplicitNodeId(usize);

impl ExplicitNodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ExplicitNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named node of an [`ExplicitTree`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitNode {
    name: String,
    children: Vec<ExplicitNodeId>,
}

impl ExplicitNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child references in input order. They may point anywhere in the arena.
    pub fn children(&self) -> &[ExplicitNodeId] {
        &self.children
    }
}

/// A `{ name, children }` tree stored as an arena of nodes.
///
/// The root is always the first node. Nodes without children are leaves.
///
/// # Examples
///
/// ```
/// use mindmap_core::payload::ExplicitTree;
///
/// let mut tree = ExplicitTree::leaf("Root");
/// let a = tree.push_child(tree.root(), "A");
/// tree.push_child(a, "x");
///
/// assert_eq!(tree.node_count(), 3);
/// assert_eq!(tree.name(a), Some("A"));
///
/// // References may point anywhere, including back up the tree.
/// tree.add_child(a, tree.root());
/// assert_eq!(tree.children(a).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitTree {
    nodes: Vec<ExplicitNode>,
}

impl ExplicitTree {
    /// Creates a tree with a single root node.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![ExplicitNode {
                name: name.into(),
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> ExplicitNodeId {
        ExplicitNodeId(0)
    }

    /// Number of nodes in the arena, including unreachable ones.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: ExplicitNodeId) -> Option<&ExplicitNode> {
        self.nodes.get(id.0)
    }

    /// Returns the name of a node, if it exists.
    pub fn name(&self, id: ExplicitNodeId) -> Option<&str> {
        self.node(id).map(ExplicitNode::name)
    }

    /// Returns the child references of a node. Unknown ids have no children.
    pub fn children(&self, id: ExplicitNodeId) -> &[ExplicitNodeId] {
        self.node(id).map(ExplicitNode::children).unwrap_or_default()
    }

    /// Adds a detached node and returns its id.
    pub fn add_node(&mut self, name: impl Into<String>) -> ExplicitNodeId {
        self.nodes.push(ExplicitNode {
            name: name.into(),
            children: Vec::new(),
        });
        ExplicitNodeId(self.nodes.len() - 1)
    }

    /// Appends a reference to `child` to the children of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either id does not belong to this tree.
    pub fn add_child(&mut self, parent: ExplicitNodeId, child: ExplicitNodeId) {
        assert!(
            child.0 < self.nodes.len(),
            "Adding child: node {child} does not exist"
        );
        let parent_node = self
            .nodes
            .get_mut(parent.0)
            .unwrap_or_else(|| panic!("Adding child: node {parent} does not exist"));
        parent_node.children.push(child);
    }

    /// Adds a new node named `name` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn push_child(&mut self, parent: ExplicitNodeId, name: impl Into<String>) -> ExplicitNodeId {
        let child = self.add_node(name);
        self.add_child(parent, child);
        child
    }
}
