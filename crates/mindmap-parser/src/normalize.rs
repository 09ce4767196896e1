//! Shape normalization.
//!
//! Converts each [`RawPayload`] shape into the same [`CanonicalTree`] so
//! downstream code never branches on where a tree came from.

use log::{debug, info, trace};

use mindmap_core::{
    identifier::NodeId,
    payload::{DictOfLists, ExplicitNodeId, ExplicitTree, RawPayload},
    tree::{CanonicalTree, TreeBuilder},
};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    outline::parse_outline,
};

/// Root label given to topic mappings when none is configured.
pub const DEFAULT_ROOT_LABEL: &str = "Main Topic";

/// Options for [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    root_label: String,
}

impl NormalizeOptions {
    /// Options with a custom synthetic root label for topic mappings.
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            root_label: root_label.into(),
        }
    }

    /// Label of the synthetic root created for [`RawPayload::DictOfLists`].
    pub fn root_label(&self) -> &str {
        &self.root_label
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_LABEL)
    }
}

/// Normalize any payload shape into a canonical tree.
///
/// - A topic mapping becomes a synthetic root with one child per topic and
///   one leaf per subtopic, in mapping and list order.
/// - An explicit tree is copied structurally with fresh ids.
/// - Outline text goes through [`parse_outline`].
///
/// # Errors
///
/// Explicit trees in which a node is reachable twice are rejected:
/// [`ErrorCode::E200`] when the node is its own ancestor, [`ErrorCode::E201`]
/// when it has two parents. Outline text fails only as [`parse_outline`] does.
///
/// # Examples
///
/// ```
/// use indexmap::IndexMap;
/// use mindmap_core::payload::RawPayload;
/// use mindmap_parser::{normalize, NormalizeOptions};
///
/// let mut map = IndexMap::new();
/// map.insert("A".to_string(), vec!["x".to_string(), "y".to_string()]);
/// map.insert("B".to_string(), vec!["z".to_string()]);
///
/// let tree = normalize(&RawPayload::DictOfLists(map), &NormalizeOptions::default()).unwrap();
/// assert_eq!(tree.node_count(), 6);
/// assert_eq!(tree.root().label(), "Main Topic");
/// ```
pub fn normalize(
    payload: &RawPayload,
    options: &NormalizeOptions,
) -> Result<CanonicalTree, ParseError> {
    info!(kind:% = payload.kind(); "Normalizing payload");

    let tree = match payload {
        RawPayload::DictOfLists(map) => from_dict(map, options.root_label()),
        RawPayload::ExplicitTree(tree) => from_explicit(tree)?,
        RawPayload::OutlineText(text) => parse_outline(text)?,
    };

    debug!(
        nodes = tree.node_count(),
        leaves = tree.leaf_count(),
        max_depth = tree.max_depth();
        "Payload normalized"
    );
    trace!(tree:?; "Canonical tree");
    Ok(tree)
}

fn from_dict(map: &DictOfLists, root_label: &str) -> CanonicalTree {
    let mut builder = TreeBuilder::new(root_label);
    let root = builder.root();
    for (topic, subtopics) in map {
        let topic_id = builder.add_child(root, topic.as_str());
        for subtopic in subtopics {
            builder.add_child(topic_id, subtopic.as_str());
        }
    }
    builder.build()
}

/// Copy an explicit tree, rejecting any node that is reachable twice.
///
/// The walk is iterative. Nodes are marked when first discovered, so a
/// self-reference or cycle is caught before it can be followed.
fn from_explicit(tree: &ExplicitTree) -> Result<CanonicalTree, ParseError> {
    let root = tree.root();
    let mut builder = TreeBuilder::new(node_name(tree, root)?);

    // First parent each arena node was discovered from; `Some` means visited.
    let mut discovered_from: Vec<Option<ExplicitNodeId>> = vec![None; tree.node_count()];
    let mut visited = vec![false; tree.node_count()];
    visited[root.index()] = true;

    let mut stack: Vec<(ExplicitNodeId, NodeId)> = Vec::new();
    discover_children(tree, root, &mut visited, &mut discovered_from, &mut stack, builder.root())?;

    while let Some((id, parent)) = stack.pop() {
        let node_id = builder.add_child(parent, node_name(tree, id)?);
        discover_children(tree, id, &mut visited, &mut discovered_from, &mut stack, node_id)?;
    }

    Ok(builder.build())
}

/// Mark the children of `id` as visited and push them so that they are
/// popped in input order.
fn discover_children(
    tree: &ExplicitTree,
    id: ExplicitNodeId,
    visited: &mut [bool],
    discovered_from: &mut [Option<ExplicitNodeId>],
    stack: &mut Vec<(ExplicitNodeId, NodeId)>,
    builder_id: NodeId,
) -> Result<(), ParseError> {
    let children = tree.children(id);
    for &child in children {
        let seen = visited
            .get(child.index())
            .copied()
            .ok_or_else(|| unknown_node(tree, id))?;
        if seen {
            return Err(revisit_error(tree, id, child, discovered_from).into());
        }
        visited[child.index()] = true;
        discovered_from[child.index()] = Some(id);
    }
    stack.extend(children.iter().rev().map(|&child| (child, builder_id)));
    Ok(())
}

/// Build the diagnostic for `child` being reached again from `parent`.
fn revisit_error(
    tree: &ExplicitTree,
    parent: ExplicitNodeId,
    child: ExplicitNodeId,
    discovered_from: &[Option<ExplicitNodeId>],
) -> Diagnostic {
    let child_name = tree.name(child).unwrap_or_default();
    let parent_name = tree.name(parent).unwrap_or_default();

    let mut ancestor = Some(parent);
    while let Some(current) = ancestor {
        if current == child {
            return Diagnostic::error(format!(
                "node `{child_name}` is its own ancestor (listed as a child of `{parent_name}`)"
            ))
            .with_code(ErrorCode::E200)
            .with_help("a mindmap must be a tree; remove the back-reference");
        }
        ancestor = discovered_from[current.index()];
    }

    Diagnostic::error(format!(
        "node `{child_name}` has several parents (listed again under `{parent_name}`)"
    ))
    .with_code(ErrorCode::E201)
    .with_help("give each subtopic its own node")
}

fn node_name(tree: &ExplicitTree, id: ExplicitNodeId) -> Result<&str, ParseError> {
    tree.name(id).ok_or_else(|| unknown_node(tree, id))
}

fn unknown_node(tree: &ExplicitTree, id: ExplicitNodeId) -> ParseError {
    Diagnostic::error(format!(
        "node {id} references a node outside the tree ({} nodes)",
        tree.node_count()
    ))
    .with_code(ErrorCode::E101)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(tree: &CanonicalTree) -> Vec<(usize, &str)> {
        tree.iter_pre_order()
            .map(|node| (node.depth(), node.label()))
            .collect()
    }

    fn dict(entries: &[(&str, &[&str])]) -> DictOfLists {
        entries
            .iter()
            .map(|(key, values)| {
                (
                    key.to_string(),
                    values.iter().map(|value| value.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_dict_of_lists() {
        let payload = RawPayload::DictOfLists(dict(&[("A", &["x", "y"]), ("B", &["z"])]));
        let tree = normalize(&payload, &NormalizeOptions::default()).unwrap();

        assert_eq!(tree.node_count(), 6);
        assert_eq!(
            labels(&tree),
            [
                (0, "Main Topic"),
                (1, "A"),
                (2, "x"),
                (2, "y"),
                (1, "B"),
                (2, "z"),
            ]
        );
    }

    #[test]
    fn test_dict_keeps_duplicates_and_order() {
        let payload = RawPayload::DictOfLists(dict(&[("Z", &["b", "a", "b"]), ("A", &[])]));
        let tree = normalize(&payload, &NormalizeOptions::new("Notes")).unwrap();

        assert_eq!(
            labels(&tree),
            [(0, "Notes"), (1, "Z"), (2, "b"), (2, "a"), (2, "b"), (1, "A")]
        );
    }

    #[test]
    fn test_empty_dict_is_single_root() {
        let tree = normalize(
            &RawPayload::DictOfLists(DictOfLists::new()),
            &NormalizeOptions::default(),
        )
        .unwrap();

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.root().label(), DEFAULT_ROOT_LABEL);
    }

    #[test]
    fn test_explicit_tree_is_copied_in_pre_order() {
        let mut explicit = ExplicitTree::leaf("Root");
        let a = explicit.push_child(explicit.root(), "A");
        explicit.push_child(a, "A1");
        explicit.push_child(a, "A2");
        explicit.push_child(explicit.root(), "B");

        let tree = normalize(&explicit.into(), &NormalizeOptions::default()).unwrap();

        assert_eq!(
            labels(&tree),
            [(0, "Root"), (1, "A"), (2, "A1"), (2, "A2"), (1, "B")]
        );
        let ids: Vec<_> = tree.iter_pre_order().map(|node| node.id().index()).collect();
        assert_eq!(ids, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_explicit_leaf() {
        let tree = normalize(
            &ExplicitTree::leaf("solo").into(),
            &NormalizeOptions::default(),
        )
        .unwrap();
        assert_eq!(labels(&tree), [(0, "solo")]);
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let mut explicit = ExplicitTree::leaf("Root");
        let root = explicit.root();
        explicit.add_child(root, root);

        let err = normalize(&explicit.into(), &NormalizeOptions::default()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E200));
        assert!(err.to_string().contains("`Root` is its own ancestor"));
    }

    #[test]
    fn test_deep_cycle_is_rejected() {
        let mut explicit = ExplicitTree::leaf("Root");
        let a = explicit.push_child(explicit.root(), "A");
        let b = explicit.push_child(a, "B");
        explicit.add_child(b, a);

        let err = normalize(&explicit.into(), &NormalizeOptions::default()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E200));
    }

    #[test]
    fn test_shared_node_is_rejected() {
        let mut explicit = ExplicitTree::leaf("Root");
        let a = explicit.push_child(explicit.root(), "A");
        let b = explicit.push_child(explicit.root(), "B");
        let shared = explicit.push_child(a, "Shared");
        explicit.add_child(b, shared);

        let err = normalize(&explicit.into(), &NormalizeOptions::default()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E201));
        assert!(err.to_string().contains("listed again under `B`"));
    }

    #[test]
    fn test_unreachable_arena_nodes_are_ignored() {
        let mut explicit = ExplicitTree::leaf("Root");
        explicit.add_node("orphan");
        explicit.push_child(explicit.root(), "A");

        let tree = normalize(&explicit.into(), &NormalizeOptions::default()).unwrap();
        assert_eq!(labels(&tree), [(0, "Root"), (1, "A")]);
    }

    #[test]
    fn test_outline_text_delegates_to_outline_parser() {
        let payload = RawPayload::OutlineText("# Root\n## Child1\n## Child2\n### Grandchild".into());
        let tree = normalize(&payload, &NormalizeOptions::default()).unwrap();

        assert_eq!(tree, parse_outline("# Root\n## Child1\n## Child2\n### Grandchild").unwrap());
        assert_eq!(tree.max_depth(), 2);
    }

    #[test]
    fn test_deep_explicit_chain_does_not_overflow() {
        let mut explicit = ExplicitTree::leaf("n0");
        let mut current = explicit.root();
        for depth in 1..50_000 {
            current = explicit.push_child(current, format!("n{depth}"));
        }

        let tree = normalize(&explicit.into(), &NormalizeOptions::default()).unwrap();
        assert_eq!(tree.max_depth(), 49_999);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn label_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9]{0,6}( [a-zA-Z0-9]{1,6})?"
    }

    fn dict_strategy() -> impl Strategy<Value = DictOfLists> {
        prop::collection::vec(
            (label_strategy(), prop::collection::vec(label_strategy(), 0..5)),
            0..6,
        )
        .prop_map(|entries| entries.into_iter().collect())
    }

    fn as_explicit(map: &DictOfLists) -> ExplicitTree {
        let mut tree = ExplicitTree::leaf(DEFAULT_ROOT_LABEL);
        for (topic, subtopics) in map {
            let topic_id = tree.push_child(tree.root(), topic.as_str());
            for subtopic in subtopics {
                tree.push_child(topic_id, subtopic.as_str());
            }
        }
        tree
    }

    fn as_outline(map: &DictOfLists) -> String {
        let mut text = format!("# {DEFAULT_ROOT_LABEL}\n");
        for (topic, subtopics) in map {
            text.push_str(&format!("## {topic}\n"));
            for subtopic in subtopics {
                text.push_str(&format!("- {subtopic}\n"));
            }
        }
        text
    }

    fn check_shape_independence(map: &DictOfLists) -> Result<(), TestCaseError> {
        let options = NormalizeOptions::default();
        let from_dict = normalize(&RawPayload::DictOfLists(map.clone()), &options)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let from_explicit = normalize(&as_explicit(map).into(), &options)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let from_outline = normalize(&RawPayload::OutlineText(as_outline(map)), &options)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(&from_dict, &from_explicit);
        prop_assert_eq!(&from_dict, &from_outline);
        Ok(())
    }

    proptest! {
        #[test]
        fn shape_independence(map in dict_strategy()) {
            check_shape_independence(&map)?;
        }
    }
}
