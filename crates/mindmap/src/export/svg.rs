//! SVG render adapter.
//!
//! Draws a [`PositionedTree`] the way the browser front end did: straight
//! grey links, light blue node circles, labels in front of internal nodes
//! and behind leaves. Exported images carry the provenance caption beneath
//! the tree.

mod text;

use log::{debug, info};
use svg::{Document, node::Text as SvgText, node::element as svg_element};

use mindmap_core::{
    geometry::{Bounds, Insets, Point, Size},
    positioned::{PositionedNode, PositionedTree},
};

use crate::{
    color::Color,
    config::StyleConfig,
    render::{Caption, ImageBlob, ImageFormat, RenderAdapter, RenderError},
};

/// Radius of the circle drawn for every node.
pub const NODE_RADIUS: f32 = 10.0;

const LABEL_OFFSET: f32 = 15.0;
const LABEL_BASELINE_SHIFT: f32 = 3.0;
const FONT_FAMILY: &str = "sans-serif";
const FONT_SIZE: f32 = 10.0;
const CAPTION_GAP: f32 = 20.0;
const PADDING: f32 = 20.0;

const LINK_STROKE: &str = "#ccc";
const NODE_FILL: &str = "lightblue";
const NODE_STROKE: &str = "black";

/// A [`RenderAdapter`] producing SVG documents.
///
/// # Example
///
/// ```
/// # use mindmap::{export::svg::SvgAdapter, render::RenderAdapter, MindmapBuilder};
/// let builder = MindmapBuilder::default();
/// let tree = builder.parse(r#"{"A": ["x", "y"]}"#).unwrap();
/// let positioned = builder.layout(&tree).unwrap();
///
/// let mut adapter = SvgAdapter::new();
/// adapter.present(&positioned);
/// assert!(adapter.last_document().is_some());
/// ```
#[derive(Debug, Default)]
pub struct SvgAdapter {
    background: Option<Color>,
    last_document: Option<Document>,
}

impl SvgAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    /// Create an adapter styled by `style`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Render`] if the configured background color
    /// cannot be parsed.
    pub fn from_style(style: &StyleConfig) -> Result<Self, RenderError> {
        let background = style.background_color().map_err(RenderError::Render)?;
        Ok(Self::new().with_background(background))
    }

    /// The document produced by the last [`present`](RenderAdapter::present).
    pub fn last_document(&self) -> Option<&Document> {
        self.last_document.as_ref()
    }

    /// Render `tree` into a document sized to its content.
    pub fn render_document(&self, tree: &PositionedTree, caption: Option<&Caption>) -> Document {
        self.build_document(tree, caption).0
    }

    fn build_document(&self, tree: &PositionedTree, caption: Option<&Caption>) -> (Document, Size) {
        let content = content_bounds(tree);

        let caption_line = caption.map(|caption| {
            let text = caption.to_string();
            let top_left = Point::new(content.min_x(), content.max_y() + CAPTION_GAP);
            let size = text::measure(&text, FONT_FAMILY, FONT_SIZE);
            (text, Bounds::new_from_top_left(top_left, size))
        });

        let frame = caption_line
            .as_ref()
            .map_or(content, |(_, bounds)| content.merge(bounds))
            .add_padding(Insets::uniform(PADDING));
        let size = frame.to_size();
        let origin = frame.min_point();

        debug!(
            nodes = tree.node_count(),
            width = size.width(),
            height = size.height();
            "Rendering SVG document"
        );

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", size.width(), size.height()),
            )
            .set("width", size.width())
            .set("height", size.height());

        if let Some(background) = self.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", size.width())
                    .set("height", size.height())
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );
        }

        let mut scene = svg_element::Group::new().set(
            "transform",
            format!("translate({}, {})", -origin.x(), -origin.y()),
        );
        scene = scene.add(render_links(tree));
        scene = scene.add(render_nodes(tree));

        if let Some((text, bounds)) = caption_line {
            scene = scene.add(
                svg_element::Text::new("")
                    .set("class", "caption")
                    .set("x", bounds.min_x())
                    .set("y", bounds.min_y())
                    .set("dominant-baseline", "hanging")
                    .set("font-family", FONT_FAMILY)
                    .set("font-size", FONT_SIZE)
                    .add(SvgText::new(text)),
            );
        }

        (doc.add(scene), size)
    }
}

impl RenderAdapter for SvgAdapter {
    fn present(&mut self, tree: &PositionedTree) {
        info!(nodes = tree.node_count(); "Presenting tree");
        self.last_document = Some(self.render_document(tree, None));
    }

    fn rasterize(
        &mut self,
        tree: &PositionedTree,
        caption: &Caption,
        size: Size,
    ) -> Result<ImageBlob, RenderError> {
        if size.is_empty() {
            return Err(RenderError::EmptySize {
                width: size.width(),
                height: size.height(),
            });
        }

        let (doc, _) = self.build_document(tree, Some(caption));
        let doc = doc
            .set("width", size.width())
            .set("height", size.height());

        info!(width = size.width(), height = size.height(); "Rasterized SVG");
        Ok(ImageBlob {
            format: ImageFormat::Svg,
            size,
            bytes: doc.to_string().into_bytes(),
        })
    }
}

fn render_links(tree: &PositionedTree) -> svg_element::Group {
    tree.links().fold(
        svg_element::Group::new().set("class", "links"),
        |group, link| {
            group.add(
                svg_element::Line::new()
                    .set("x1", link.source.x())
                    .set("y1", link.source.y())
                    .set("x2", link.target.x())
                    .set("y2", link.target.y())
                    .set("stroke", LINK_STROKE),
            )
        },
    )
}

fn render_nodes(tree: &PositionedTree) -> svg_element::Group {
    tree.nodes().fold(
        svg_element::Group::new().set("class", "nodes"),
        |group, node| group.add(render_node(node)),
    )
}

fn render_node(node: &PositionedNode) -> svg_element::Group {
    let position = node.position();
    let (dx, anchor) = label_placement(node);

    let circle = svg_element::Circle::new()
        .set("r", NODE_RADIUS)
        .set("fill", NODE_FILL)
        .set("stroke", NODE_STROKE);

    let label = svg_element::Text::new("")
        .set("x", dx)
        .set("dy", LABEL_BASELINE_SHIFT)
        .set("text-anchor", anchor)
        .set("font-family", FONT_FAMILY)
        .set("font-size", FONT_SIZE)
        .add(SvgText::new(node.label()));

    svg_element::Group::new()
        .set("class", "node")
        .set(
            "transform",
            format!("translate({}, {})", position.x(), position.y()),
        )
        .add(circle)
        .add(label)
}

/// Horizontal label offset and text anchor: internal nodes are labelled on
/// their left, leaves on their right.
fn label_placement(node: &PositionedNode) -> (f32, &'static str) {
    if node.is_leaf() {
        (LABEL_OFFSET, "start")
    } else {
        (-LABEL_OFFSET, "end")
    }
}

fn label_bounds(node: &PositionedNode) -> Bounds {
    let size = text::measure(node.label(), FONT_FAMILY, FONT_SIZE);
    let position = node.position();
    let (dx, _) = label_placement(node);
    let left = if node.is_leaf() {
        position.x() + dx
    } else {
        position.x() + dx - size.width()
    };
    Bounds::new_from_top_left(Point::new(left, position.y() - size.height() / 2.0), size)
}

/// Bounds of every circle and label in the tree.
fn content_bounds(tree: &PositionedTree) -> Bounds {
    let circle = Size::new(NODE_RADIUS * 2.0, NODE_RADIUS * 2.0);
    tree.nodes()
        .fold(tree.bounds(), |bounds, node| {
            bounds
                .merge(&Bounds::new_from_center(node.position(), circle))
                .merge(&label_bounds(node))
        })
}
