//! Tidy-tree layout of canonical trees.
//!
//! [`LayoutEngine`] assigns every node of a [`CanonicalTree`] a point:
//!
//! - the *depth axis* coordinate is `depth * level_spacing`;
//! - the *sibling axis* coordinate comes from leaf slots (see the `tidy` module),
//!   scaled by `sibling_spacing` or spread over the configured height.
//!
//! [`Orientation`](mindmap_core::positioned::Orientation) maps the two axes
//! onto x and y. The result depends only on the tree's shape and child
//! order, so re-running a layout yields bit-identical positions.

mod tidy;

use log::{debug, info};

use mindmap_core::{geometry::Point, positioned::PositionedTree, tree::CanonicalTree};

use crate::{config::LayoutConfig, error::MindmapError};

use tidy::Slots;

/// Computes positioned trees from canonical trees.
///
/// # Examples
///
/// ```
/// # use mindmap::{config::LayoutConfig, layout::LayoutEngine};
/// # use mindmap_core::tree::TreeBuilder;
/// let mut builder = TreeBuilder::new("Root");
/// builder.add_child(builder.root(), "A");
/// builder.add_child(builder.root(), "B");
/// let tree = builder.build();
///
/// let engine = LayoutEngine::new(LayoutConfig::default().with_sibling_spacing(40.0));
/// let positioned = engine.layout(&tree).unwrap();
///
/// let ys: Vec<f32> = positioned.nodes().map(|node| node.position().y()).collect();
/// assert_eq!(ys, [20.0, 0.0, 40.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `tree`.
    ///
    /// # Errors
    ///
    /// Returns [`MindmapError::Layout`] if the configuration is invalid.
    pub fn layout(&self, tree: &CanonicalTree) -> Result<PositionedTree, MindmapError> {
        self.config.validate().map_err(MindmapError::Layout)?;

        let max_depth = tree.max_depth();
        let level_spacing = self.level_spacing(max_depth);
        let slots = Slots::assign(tree);
        let sibling_spacing = self.sibling_spacing(slots.leaves());
        let orientation = self.config.orientation();

        info!(
            nodes = tree.node_count(),
            leaves = slots.leaves(),
            max_depth,
            orientation:?;
            "Laying out tree"
        );
        debug!(level_spacing, sibling_spacing; "Resolved layout spacing");

        let positions: Vec<Point> = tree
            .nodes()
            .map(|node| {
                let primary = node.depth() as f32 * level_spacing;
                let secondary = slots.get(node.id().index()) * sibling_spacing;
                orientation.to_point(primary, secondary)
            })
            .collect();

        PositionedTree::from_canonical(tree, &positions, orientation).ok_or_else(|| {
            MindmapError::Layout(format!(
                "computed {} positions for {} nodes",
                positions.len(),
                tree.node_count()
            ))
        })
    }

    /// Distance between depths: configured, or derived from the canvas.
    fn level_spacing(&self, max_depth: usize) -> f32 {
        match (self.config.level_spacing(), max_depth) {
            (Some(spacing), _) => spacing,
            (None, 0) => 0.0,
            (None, depth) => (self.config.width() - self.config.margin()) / depth as f32,
        }
    }

    /// Distance between neighbouring leaf slots.
    fn sibling_spacing(&self, leaves: usize) -> f32 {
        match (self.config.sibling_spacing(), leaves) {
            (Some(spacing), _) => spacing,
            (None, 0 | 1) => 0.0,
            (None, leaves) => self.config.height() / (leaves - 1) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use mindmap_core::{identifier::NodeId, positioned::Orientation, tree::TreeBuilder};

    use super::*;

    fn layout_with_orientation(
        tree: &CanonicalTree,
        orientation: Orientation,
    ) -> Result<PositionedTree, MindmapError> {
        LayoutEngine::new(LayoutConfig::default().with_orientation(orientation)).layout(tree)
    }

    /// Main Topic → A(x, y), B(z)
    fn sample_tree() -> CanonicalTree {
        let mut builder = TreeBuilder::new("Main Topic");
        let a = builder.add_child(builder.root(), "A");
        builder.add_child(a, "x");
        builder.add_child(a, "y");
        let b = builder.add_child(builder.root(), "B");
        builder.add_child(b, "z");
        builder.build()
    }

    #[test]
    fn test_root_only_tree_is_at_origin() {
        let positioned = LayoutEngine::default()
            .layout(&CanonicalTree::leaf("solo"))
            .unwrap();

        assert_eq!(positioned.node_count(), 1);
        assert_eq!(positioned.root().position(), Point::default());
        assert_eq!(positioned.root().parent_link(), None);
    }

    #[test]
    fn test_default_spacing_fills_legacy_canvas() {
        let positioned = LayoutEngine::default().layout(&sample_tree()).unwrap();

        // (800 - 200) / 2 per level, 600 / (3 - 1) per leaf slot.
        let leaf = positioned
            .nodes()
            .find(|node| node.label() == "z")
            .unwrap();
        assert_approx_eq!(f32, leaf.position().x(), 600.0);
        assert_approx_eq!(f32, leaf.position().y(), 600.0);

        let root = positioned.root();
        assert_approx_eq!(f32, root.position().x(), 0.0);
        assert_approx_eq!(f32, root.position().y(), 375.0);
    }

    #[test]
    fn test_configured_spacing() {
        let engine = LayoutEngine::new(
            LayoutConfig::default()
                .with_level_spacing(100.0)
                .with_sibling_spacing(10.0),
        );
        let positioned = engine.layout(&sample_tree()).unwrap();

        let a = positioned.node(NodeId::ROOT).unwrap().children()[0];
        let a = positioned.node(a).unwrap();
        assert_approx_eq!(f32, a.position().x(), 100.0);
        assert_approx_eq!(f32, a.position().y(), 5.0);
        assert_eq!(a.parent_link(), Some(positioned.root().position()));
    }

    #[test]
    fn test_vertical_swaps_axes() {
        let tree = sample_tree();
        let horizontal = layout_with_orientation(&tree, Orientation::Horizontal).unwrap();
        let vertical = layout_with_orientation(&tree, Orientation::Vertical).unwrap();

        for (h, v) in horizontal.nodes().zip(vertical.nodes()) {
            assert_eq!(h.position().transpose(), v.position());
        }
        assert_eq!(vertical.orientation(), Orientation::Vertical);
    }

    #[test]
    fn test_chain_has_zero_sibling_offset() {
        let mut builder = TreeBuilder::new("a");
        let b = builder.add_child(builder.root(), "b");
        builder.add_child(b, "c");
        let positioned = LayoutEngine::default().layout(&builder.build()).unwrap();

        for node in positioned.nodes() {
            assert_approx_eq!(f32, node.position().y(), 0.0);
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let engine = LayoutEngine::new(LayoutConfig::default().with_canvas(100.0, 600.0, 150.0));
        let err = engine.layout(&sample_tree()).unwrap_err();
        assert!(matches!(err, MindmapError::Layout(message) if message.contains("margin")));
    }

    #[test]
    fn test_wide_tree_does_not_overflow() {
        let mut builder = TreeBuilder::new("root");
        for i in 0..10_000 {
            builder.add_child(builder.root(), format!("leaf {i}"));
        }
        let positioned = LayoutEngine::default().layout(&builder.build()).unwrap();
        assert_eq!(positioned.node_count(), 10_001);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use mindmap_core::{positioned::Orientation, tree::TreeBuilder};

    use super::*;

    /// Random trees: node `i` picks a parent among nodes `0..i`.
    fn tree_strategy() -> impl Strategy<Value = CanonicalTree> {
        prop::collection::vec(any::<prop::sample::Index>(), 0..60).prop_map(|parents| {
            let mut builder = TreeBuilder::new("root");
            let mut ids = vec![builder.root()];
            for (i, parent) in parents.into_iter().enumerate() {
                let parent = ids[parent.index(i + 1)];
                ids.push(builder.add_child(parent, format!("n{}", i + 1)));
            }
            // Rebuild so that ids follow pre-order like every normalized tree.
            let tree = builder.build();
            tree.truncated(tree.max_depth())
        })
    }

    fn config_strategy() -> impl Strategy<Value = LayoutConfig> {
        (
            prop_oneof![Just(Orientation::Horizontal), Just(Orientation::Vertical)],
            prop::option::of(1.0f32..500.0),
            prop::option::of(1.0f32..100.0),
        )
            .prop_map(|(orientation, level, sibling)| {
                let mut config = LayoutConfig::default().with_orientation(orientation);
                if let Some(level) = level {
                    config = config.with_level_spacing(level);
                }
                if let Some(sibling) = sibling {
                    config = config.with_sibling_spacing(sibling);
                }
                config
            })
    }

    fn check_idempotent(tree: &CanonicalTree, config: LayoutConfig) -> Result<(), TestCaseError> {
        let engine = LayoutEngine::new(config);
        let first = engine.layout(tree).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let second = engine.layout(tree).map_err(|e| TestCaseError::fail(e.to_string()))?;
        for (a, b) in first.nodes().zip(second.nodes()) {
            prop_assert_eq!(a.position().x().to_bits(), b.position().x().to_bits());
            prop_assert_eq!(a.position().y().to_bits(), b.position().y().to_bits());
        }
        Ok(())
    }

    fn check_axis_ordering(tree: &CanonicalTree, config: LayoutConfig) -> Result<(), TestCaseError> {
        let positioned = LayoutEngine::new(config)
            .layout(tree)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let orientation = positioned.orientation();

        for node in positioned.nodes() {
            if let Some(parent) = node.parent_link() {
                prop_assert!(
                    orientation.primary(node.position()) > orientation.primary(parent),
                    "depth axis must grow from parent to child"
                );
            }
            let siblings: Vec<f32> = positioned
                .children(node.id())
                .map(|child| orientation.secondary(child.position()))
                .collect();
            for pair in siblings.windows(2) {
                prop_assert!(pair[0] < pair[1], "siblings out of order: {:?}", siblings);
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn layout_is_idempotent(tree in tree_strategy(), config in config_strategy()) {
            check_idempotent(&tree, config)?;
        }

        #[test]
        fn axes_are_ordered(tree in tree_strategy(), config in config_strategy()) {
            check_axis_ordering(&tree, config)?;
        }
    }
}
