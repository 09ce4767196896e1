//! Export backends for positioned trees.
//!
//! # Pipeline Position
//!
//! ```text
//! Raw payload
//!     ↓ normalize
//! Canonical tree
//!     ↓ layout
//! Positioned tree
//!     ↓ present / rasterize (this module)
//! Image
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] — SVG output via [`svg::SvgAdapter`]

/// SVG export backend.
pub mod svg;
