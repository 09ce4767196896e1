//! Mindmap - Normalization, layout and export of hierarchical summaries
//!
//! This library turns the outline a summarization service returns (a topic
//! mapping, an explicit tree or outline text) into one canonical tree,
//! computes a deterministic tidy-tree layout for it and renders it to SVG.
//! The [`session`] module wraps the pipeline in a controller that keeps the
//! displayed tree consistent while submissions race each other.

pub mod color;
pub mod config;
pub mod export;
pub mod layout;
pub mod render;
pub mod session;

mod error;

pub use mindmap_core::{geometry, identifier, payload, positioned, tree};

pub use error::MindmapError;

use log::{debug, info, trace};

use config::AppConfig;
use export::svg::SvgAdapter;
use layout::LayoutEngine;
use payload::RawPayload;
use positioned::PositionedTree;
use render::Caption;
use tree::CanonicalTree;

/// Builder for decoding, laying out and rendering mindmaps.
///
/// # Examples
///
/// ```rust
/// use mindmap::{MindmapBuilder, config::AppConfig};
///
/// let source = r#"{"A": ["x", "y"], "B": ["z"]}"#;
///
/// let builder = MindmapBuilder::new(AppConfig::default());
///
/// // Decode and normalize to a canonical tree
/// let tree = builder.parse(source)
///     .expect("Failed to parse");
/// assert_eq!(tree.node_count(), 6);
///
/// // Render the tree to SVG
/// let svg = builder.render_svg(&tree, None)
///     .expect("Failed to render");
/// assert!(svg.contains("<svg"));
/// ```
#[derive(Debug, Default)]
pub struct MindmapBuilder {
    config: AppConfig,
}

impl MindmapBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Decode a payload body (JSON or outline text).
    ///
    /// # Errors
    ///
    /// Returns [`MindmapError::Format`] carrying `source` if the body has
    /// none of the recognised shapes.
    pub fn decode(&self, source: &str) -> Result<RawPayload, MindmapError> {
        info!("Decoding payload");
        let payload = mindmap_parser::decode_auto(source)
            .map_err(|err| MindmapError::new_format_error(err, source))?;
        debug!(payload_kind:% = payload.kind(); "Payload decoded");
        Ok(payload)
    }

    /// Normalize a decoded payload, applying the configured depth limit.
    ///
    /// # Errors
    ///
    /// Returns [`MindmapError::Format`] if the payload is not a tree (cycles,
    /// shared nodes).
    pub fn normalize(&self, payload: &RawPayload) -> Result<CanonicalTree, MindmapError> {
        let options = self.config.normalize().to_options();
        let tree = mindmap_parser::normalize(payload, &options).map_err(|err| {
            let src = match payload {
                RawPayload::OutlineText(text) => text.as_str(),
                _ => "",
            };
            MindmapError::new_format_error(err, src)
        })?;

        let tree = match self.config.normalize().max_depth() {
            Some(max_depth) => tree.truncated(max_depth),
            None => tree,
        };
        debug!(nodes = tree.node_count(), depth = tree.max_depth(); "Tree normalized");
        trace!(outline = tree.to_outline().as_str(); "Canonical tree");
        Ok(tree)
    }

    /// Decode and normalize `source` into a canonical tree.
    ///
    /// # Errors
    ///
    /// Returns [`MindmapError::Format`] with `source` attached, so that the
    /// diagnostics' spans can be rendered against it.
    pub fn parse(&self, source: &str) -> Result<CanonicalTree, MindmapError> {
        let payload = self.decode(source)?;
        self.normalize(&payload).map_err(|err| match err {
            MindmapError::Format { err, src } if src.is_empty() => {
                MindmapError::new_format_error(err, source)
            }
            other => other,
        })
    }

    /// Lay out a canonical tree with the configured layout settings.
    ///
    /// # Errors
    ///
    /// Returns [`MindmapError::Layout`] if the layout configuration is invalid.
    pub fn layout(&self, tree: &CanonicalTree) -> Result<PositionedTree, MindmapError> {
        LayoutEngine::new(self.config.layout().clone()).layout(tree)
    }

    /// Lay out and render a canonical tree to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`MindmapError::Layout`] for an invalid layout configuration
    /// and [`MindmapError::Export`] for an invalid style.
    pub fn render_svg(
        &self,
        tree: &CanonicalTree,
        caption: Option<&Caption>,
    ) -> Result<String, MindmapError> {
        let positioned = self.layout(tree)?;
        info!(nodes = positioned.node_count(); "Layout calculated");

        let adapter = SvgAdapter::from_style(self.config.style())?;
        let svg = adapter.render_document(&positioned, caption).to_string();

        info!("SVG rendered successfully");
        Ok(svg)
    }
}
