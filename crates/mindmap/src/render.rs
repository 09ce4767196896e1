//! Render adapter interface.
//!
//! The session hands every committed [`PositionedTree`] to a
//! [`RenderAdapter`] and asks the same adapter for a static image on export.
//! What "presenting" means (drawing on screen, keeping an SVG document in
//! memory, ...) is up to the adapter.
//!
//! [`SvgAdapter`](crate::export::svg::SvgAdapter) is the built-in adapter.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use mindmap_core::{geometry::Size, positioned::PositionedTree};

/// Boundary between the session and whatever draws trees.
pub trait RenderAdapter {
    /// Show `tree`, replacing whatever was shown before.
    fn present(&mut self, tree: &PositionedTree);

    /// Produce a static image of `tree` at `size`, captioned with `caption`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the image cannot be produced. Failing
    /// must not change what [`present`](Self::present) shows.
    fn rasterize(
        &mut self,
        tree: &PositionedTree,
        caption: &Caption,
        size: Size,
    ) -> Result<ImageBlob, RenderError>;
}

/// Provenance line attached to exported images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

impl Caption {
    pub fn new(model: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            model: model.into(),
            timestamp,
        }
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generated by {} at {}",
            self.model,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Encodings an adapter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Svg,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
        }
    }
}

/// An encoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlob {
    pub format: ImageFormat,
    pub size: Size,
    pub bytes: Vec<u8>,
}

/// Errors reported by render adapters.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot rasterize to an empty size ({width}x{height})")]
    EmptySize { width: f32, height: f32 },

    #[error("render error: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_caption_display() {
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
        let caption = Caption::new("gemini", timestamp);

        assert_eq!(
            caption.to_string(),
            "Generated by gemini at 2024-05-17T09:30:00Z"
        );
    }

    #[test]
    fn test_image_format() {
        assert_eq!(ImageFormat::Svg.mime_type(), "image/svg+xml");
        assert_eq!(ImageFormat::Svg.extension(), "svg");
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::EmptySize {
            width: 0.0,
            height: 600.0,
        };
        assert_eq!(err.to_string(), "cannot rasterize to an empty size (0x600)");

        let err = RenderError::Render("unknown colour `blurple`".to_string());
        assert_eq!(err.to_string(), "render error: unknown colour `blurple`");
    }
}
