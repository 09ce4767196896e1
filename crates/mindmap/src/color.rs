//! Colour handling for rendered mindmaps.
//!
//! [`Color`] wraps the `DynamicColor` type from the `color` crate so that
//! any CSS colour string ("#ff0000", "rgb(255, 0, 0)", "lightblue", ...) can
//! be used in configuration.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A parsed CSS colour.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Parse a CSS colour string.
    ///
    /// # Examples
    ///
    /// ```
    /// use mindmap::color::Color;
    ///
    /// assert!(Color::new("lightblue").is_ok());
    /// assert!(Color::new("not-a-colour").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }

    /// Alpha component between 0.0 (transparent) and 1.0 (opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<Color> for svg::node::Value {
    fn from(color: Color) -> Self {
        Self::from(color.to_string())
    }
}
