//! Diagnostics for payload decoding and normalization.
//!
//! Every failure to turn a payload into a canonical tree is reported as a
//! [`ParseError`] wrapping one or more [`Diagnostic`]s. A diagnostic carries
//! a severity, an optional [`ErrorCode`], a message, labelled source spans
//! and help text.
//!
//! # Example
//!
//! ```
//! # use mindmap_parser::error::{Diagnostic, ErrorCode};
//! # use mindmap_parser::Span;
//!
//! let diag = Diagnostic::error("subtopic of `Rust` is not a string")
//!     .with_code(ErrorCode::E102)
//!     .with_label(Span::new(12..14), "expected a string")
//!     .with_help("subtopic lists may only contain strings");
//!
//! assert_eq!(diag.to_string(), "error[E102]: subtopic of `Rust` is not a string");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::{Diagnostic, Label, LabelRole};
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
pub use severity::Severity;
