//! Label measurement with cosmic-text.

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use mindmap_core::geometry::Size;

/// Measures rendered text extents with a shared [`FontSystem`].
///
/// Loading system fonts is slow, so one instance is created lazily and
/// reused for every measurement.
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Size of `text` in pixels for `font_family` at `font_px` pixels.
    ///
    /// Falls back to an estimate from the character count when no font
    /// produced any glyph.
    fn calculate_text_size(&self, text: &str, font_family: &str, font_px: f32) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let metrics = Metrics::new(font_px, font_px * 1.15);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        let attrs = Attrs::new().family(Family::Name(font_family));

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                width = width.max(last.x + last.w);
            }
            height += metrics.line_height;
        }

        // No usable font: estimate from the character count.
        if width == 0.0 {
            width = text.chars().count() as f32 * font_px * 0.55;
        }
        if height == 0.0 {
            height = metrics.line_height;
        }

        Size::new(width, height)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();

/// Measure a single-line label.
pub(super) fn measure(text: &str, font_family: &str, font_px: f32) -> Size {
    TEXT_MANAGER
        .get_or_init(TextManager::new)
        .calculate_text_size(text, font_family, font_px)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_size() {
        assert_eq!(measure("", "sans-serif", 12.0), Size::default());
    }

    #[test]
    fn test_longer_text_is_wider() {
        let short = measure("ab", "sans-serif", 12.0);
        let long = measure("abcdefghijklmnop", "sans-serif", 12.0);

        assert!(short.width() > 0.0);
        assert!(short.height() > 0.0);
        assert!(long.width() > short.width());
    }

    #[test]
    fn test_larger_font_is_taller() {
        let small = measure("Topic", "sans-serif", 10.0);
        let large = measure("Topic", "sans-serif", 20.0);
        assert!(large.height() > small.height());
    }
}
