//! # Mindmap Parser
//!
//! Turns hierarchy payloads into canonical trees. This crate provides:
//!
//! - [`decode_json`] / [`decode_auto`]: payload bodies → [`RawPayload`]
//! - [`parse_outline`]: heading/list/indentation text → [`CanonicalTree`]
//! - [`normalize`]: any [`RawPayload`] shape → [`CanonicalTree`]
//!
//! Failures are reported as [`ParseError`]s carrying coded diagnostics.
//!
//! ## Usage
//!
//! ```
//! # use mindmap_parser::{decode_auto, normalize, NormalizeOptions, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let payload = decode_auto(r#"{"mindmap": {"Rust": ["Ownership", "Traits"]}}"#)?;
//!     let tree = normalize(&payload, &NormalizeOptions::default())?;
//!
//!     assert_eq!(tree.root().label(), "Main Topic");
//!     assert_eq!(tree.leaf_count(), 2);
//!     Ok(())
//! }
//! ```
//!
//! [`RawPayload`]: mindmap_core::payload::RawPayload
//! [`CanonicalTree`]: mindmap_core::tree::CanonicalTree

mod decode;
pub mod error;
mod normalize;
mod outline;
mod span;

pub use decode::{decode_auto, decode_json};
pub use error::ParseError;
pub use normalize::{DEFAULT_ROOT_LABEL, NormalizeOptions, normalize};
pub use outline::parse_outline;
pub use span::Span;
