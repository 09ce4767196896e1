//! Error types for mindmap operations.
//!
//! [`MindmapError`] covers the pipeline used by [`MindmapBuilder`]:
//! decoding and normalizing payloads, laying out trees and exporting them.
//! Errors from a [`Session`](crate::session::Session) convert into it with
//! [`MindmapError::from_session_error`].
//!
//! [`MindmapBuilder`]: crate::MindmapBuilder

use std::io;

use thiserror::Error;

use mindmap_parser::ParseError;

use crate::{render::RenderError, session::SessionError};

/// The main error type for mindmap operations.
///
/// The `Format` variant keeps the payload source next to the diagnostics so
/// that callers can render labelled spans against it.
#[derive(Debug, Error)]
pub enum MindmapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Format { err: ParseError, src: String },

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(#[from] RenderError),

    #[error("Session error: {0}")]
    Session(String),
}

impl MindmapError {
    /// Create a new `Format` error with the associated payload source.
    pub fn new_format_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Format {
            err,
            src: src.into(),
        }
    }

    /// Convert a [`SessionError`], attaching `src` to format diagnostics.
    pub fn from_session_error(err: SessionError, src: impl Into<String>) -> Self {
        match err {
            SessionError::Format(err) => Self::new_format_error(err, src),
            SessionError::Layout(message) => Self::Layout(message),
            SessionError::Export(err) => Self::Export(err),
            other => Self::Session(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use mindmap_parser::error::{Diagnostic, ErrorCode};

    use crate::session::SessionState;

    use super::*;

    #[test]
    fn test_session_format_error_keeps_source() {
        let parse_err = ParseError::from(Diagnostic::error("cycle").with_code(ErrorCode::E200));
        let err = MindmapError::from_session_error(SessionError::Format(parse_err), "{}");

        match err {
            MindmapError::Format { err, src } => {
                assert_eq!(err.code(), Some(ErrorCode::E200));
                assert_eq!(src, "{}");
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_session_state_errors_become_session_errors() {
        let err = MindmapError::from_session_error(SessionError::NotReady(SessionState::Idle), "");
        assert_eq!(
            err.to_string(),
            "Session error: no mindmap is ready (session is idle)"
        );

        let err = MindmapError::from_session_error(SessionError::Layout("bad".into()), "");
        assert_eq!(err.to_string(), "Layout error: bad");
    }
}
