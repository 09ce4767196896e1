//! Configuration types for mindmap layout, normalization and export.
//!
//! All types implement [`serde::Deserialize`] so the command-line front end
//! can load them from TOML. Every field has a default, so an empty file (or
//! no file at all) is a valid configuration.
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`LayoutConfig`] - Orientation, spacing and canvas of the tidy-tree layout.
//! - [`NormalizeConfig`] - Synthetic root label and outline depth.
//! - [`StyleConfig`] - Visual styling such as background color.
//! - [`ExportConfig`] - Model identifier and raster size for exports.
//!
//! # Example
//!
//! ```
//! # use mindmap::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.normalize().root_label(), "Main Topic");
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use mindmap_core::{geometry::Size, positioned::Orientation};
use mindmap_parser::{DEFAULT_ROOT_LABEL, NormalizeOptions};

use crate::color::Color;

/// Canvas width of the legacy renderer.
pub const DEFAULT_WIDTH: f32 = 800.0;
/// Canvas height of the legacy renderer.
pub const DEFAULT_HEIGHT: f32 = 600.0;
/// Horizontal room the legacy renderer reserved for labels.
pub const DEFAULT_MARGIN: f32 = 200.0;
/// Model the submission service uses unless told otherwise.
pub const DEFAULT_MODEL: &str = "gemini";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    normalize: NormalizeConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    export: ExportConfig,
}

impl AppConfig {
    pub fn new(
        layout: LayoutConfig,
        normalize: NormalizeConfig,
        style: StyleConfig,
        export: ExportConfig,
    ) -> Self {
        Self {
            layout,
            normalize,
            style,
            export,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }

    pub fn normalize(&self) -> &NormalizeConfig {
        &self.normalize
    }

    pub fn normalize_mut(&mut self) -> &mut NormalizeConfig {
        &mut self.normalize
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn export(&self) -> &ExportConfig {
        &self.export
    }

    pub fn export_mut(&mut self) -> &mut ExportConfig {
        &mut self.export
    }
}

/// Tidy-tree layout settings.
///
/// `level_spacing` is the distance between depths. When unset it is derived
/// from the canvas as `(width - margin) / max_depth`. `sibling_spacing` is the
/// distance between neighbouring leaves; when unset the leaves are spread over
/// `height`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    orientation: Orientation,
    level_spacing: Option<f32>,
    sibling_spacing: Option<f32>,
    width: f32,
    height: f32,
    margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            level_spacing: None,
            sibling_spacing: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            margin: DEFAULT_MARGIN,
        }
    }
}

impl LayoutConfig {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn level_spacing(&self) -> Option<f32> {
        self.level_spacing
    }

    pub fn sibling_spacing(&self) -> Option<f32> {
        self.sibling_spacing
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_level_spacing(mut self, spacing: f32) -> Self {
        self.level_spacing = Some(spacing);
        self
    }

    pub fn with_sibling_spacing(mut self, spacing: f32) -> Self {
        self.sibling_spacing = Some(spacing);
        self
    }

    /// Set the canvas the derived spacings are computed from.
    pub fn with_canvas(mut self, width: f32, height: f32, margin: f32) -> Self {
        self.width = width;
        self.height = height;
        self.margin = margin;
        self
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Check that every spacing and canvas value is usable.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending setting.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("width", Some(self.width)),
            ("height", Some(self.height)),
            ("level_spacing", self.level_spacing),
            ("sibling_spacing", self.sibling_spacing),
        ];
        for (name, value) in positive {
            match value {
                Some(value) if !(value.is_finite() && value > 0.0) => {
                    return Err(format!("`{name}` must be a positive number, got {value}"));
                }
                _ => {}
            }
        }

        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(format!(
                "`margin` must be a non-negative number, got {}",
                self.margin
            ));
        }
        if self.margin >= self.width {
            return Err(format!(
                "`margin` ({}) must be smaller than `width` ({})",
                self.margin, self.width
            ));
        }
        Ok(())
    }
}

/// Normalization settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    root_label: String,
    max_depth: Option<usize>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            max_depth: None,
        }
    }
}

impl NormalizeConfig {
    /// Label of the synthetic root created for topic mappings.
    pub fn root_label(&self) -> &str {
        &self.root_label
    }

    /// Deepest level kept in the displayed tree, `None` for all levels.
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn with_root_label(mut self, root_label: impl Into<String>) -> Self {
        self.root_label = root_label.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn set_max_depth(&mut self, max_depth: Option<usize>) {
        self.max_depth = max_depth;
    }

    /// Options to pass to [`mindmap_parser::normalize`].
    pub fn to_options(&self) -> NormalizeOptions {
        NormalizeOptions::new(self.root_label.as_str())
    }
}

/// Visual styling configuration for rendered mindmaps.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct StyleConfig {
    /// Background color as a CSS color string.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    pub fn new(background_color: Option<String>) -> Self {
        Self { background_color }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    model: String,
    width: f32,
    height: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl ExportConfig {
    /// Model identifier recorded in export captions.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Raster size requested from the render adapter.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_defaults_validate() {
        let config = LayoutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.orientation(), Orientation::Horizontal);
        assert_eq!(config.level_spacing(), None);
    }

    #[test]
    fn test_layout_validation_rejects_bad_values() {
        let cases = [
            LayoutConfig::default().with_level_spacing(0.0),
            LayoutConfig::default().with_sibling_spacing(f32::NAN),
            LayoutConfig::default().with_canvas(-1.0, 600.0, 0.0),
            LayoutConfig::default().with_canvas(800.0, f32::INFINITY, 200.0),
            LayoutConfig::default().with_canvas(200.0, 600.0, 200.0),
            LayoutConfig::default().with_canvas(800.0, 600.0, -5.0),
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_layout_validation_message_names_setting() {
        let err = LayoutConfig::default()
            .with_sibling_spacing(-3.0)
            .validate()
            .unwrap_err();
        assert!(err.contains("`sibling_spacing`"));
    }

    #[test]
    fn test_normalize_config_to_options() {
        let config = NormalizeConfig::default().with_root_label("Lecture");
        assert_eq!(config.to_options().root_label(), "Lecture");
        assert_eq!(config.max_depth(), None);
    }

    #[test]
    fn test_style_background_color() {
        assert_eq!(StyleConfig::default().background_color(), Ok(None));
        assert!(
            StyleConfig::new(Some("white".into()))
                .background_color()
                .unwrap()
                .is_some()
        );
        assert!(StyleConfig::new(Some("???".into())).background_color().is_err());
    }

    #[test]
    fn test_export_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.model(), "gemini");
        assert_eq!(config.size(), Size::new(800.0, 600.0));
    }
}
