//! Positioned trees: canonical trees annotated with layout coordinates.
//!
//! A [`PositionedTree`] is the output of the layout engine and the input of
//! every renderer. It mirrors the canonical tree node for node (same ids,
//! labels, depths and child order) and adds a [`Point`] per node plus the
//! parent's point for drawing edges.

use serde::Deserialize;

use crate::{
    geometry::{Bounds, Point},
    identifier::NodeId,
    tree::{CanonicalNode, CanonicalTree},
};

/// Which screen axis carries tree depth.
///
/// Orientation only decides how the two layout axes map onto x and y; the
/// layout algorithm itself is the same for both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Depth grows to the right, siblings stack downward.
    #[default]
    Horizontal,
    /// Depth grows downward, siblings spread to the right.
    Vertical,
}

impl Orientation {
    /// Maps a (depth-axis, sibling-axis) pair onto screen coordinates.
    pub fn to_point(self, primary: f32, secondary: f32) -> Point {
        match self {
            Self::Horizontal => Point::new(primary, secondary),
            Self::Vertical => Point::new(secondary, primary),
        }
    }

    /// Returns the depth-axis component of a screen point.
    pub fn primary(self, point: Point) -> f32 {
        match self {
            Self::Horizontal => point.x(),
            Self::Vertical => point.y(),
        }
    }

    /// Returns the sibling-axis component of a screen point.
    pub fn secondary(self, point: Point) -> f32 {
        match self {
            Self::Horizontal => point.y(),
            Self::Vertical => point.x(),
        }
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            other => Err(format!(
                "unknown orientation `{other}` (expected `horizontal` or `vertical`)"
            )),
        }
    }
}

/// A canonical node together with its layout position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    id: NodeId,
    label: String,
    depth: usize,
    children: Vec<NodeId>,
    position: Point,
    parent_link: Option<Point>,
}

impl PositionedNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Position of the node in layout space.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Position of the parent node, `None` for the root.
    pub fn parent_link(&self) -> Option<Point> {
        self.parent_link
    }
}

/// A link between a parent and one of its children, ready for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub source: Point,
    pub target: Point,
}

/// A tree whose nodes carry layout coordinates.
///
/// Node ids match the [`CanonicalTree`] the layout was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedTree {
    nodes: Vec<PositionedNode>,
    orientation: Orientation,
}

impl PositionedTree {
    /// Attaches positions to a canonical tree.
    ///
    /// `positions` is indexed by [`NodeId::index`] and must hold exactly one
    /// point per node; returns `None` otherwise.
    pub fn from_canonical(
        tree: &CanonicalTree,
        positions: &[Point],
        orientation: Orientation,
    ) -> Option<Self> {
        if positions.len() != tree.node_count() {
            return None;
        }

        let nodes = tree
            .nodes()
            .map(|node: &CanonicalNode| PositionedNode {
                id: node.id(),
                label: node.label().to_string(),
                depth: node.depth(),
                children: node.children().to_vec(),
                position: positions[node.id().index()],
                parent_link: node.parent().map(|parent| positions[parent.index()]),
            })
            .collect();

        Some(Self { nodes, orientation })
    }

    pub fn root(&self) -> &PositionedNode {
        &self.nodes[NodeId::ROOT.index()]
    }

    pub fn node(&self, id: NodeId) -> Option<&PositionedNode> {
        self.nodes.get(id.index())
    }

    /// Returns an iterator over the children of `id` in reading order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &PositionedNode> {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.children.iter())
            .map(|child| &self.nodes[child.index()])
    }

    /// Returns an iterator over all nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &PositionedNode> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns one [`Link`] per non-root node, from its parent to itself.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        self.nodes.iter().filter_map(|node| {
            node.parent_link.map(|source| Link {
                source,
                target: node.position,
            })
        })
    }

    /// The smallest bounds containing every node position.
    pub fn bounds(&self) -> Bounds {
        self.nodes
            .iter()
            .skip(1)
            .fold(Bounds::from_point(self.root().position), |acc, node| {
                acc.include_point(node.position)
            })
    }
}
