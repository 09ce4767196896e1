//! The core diagnostic type.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, [`Label`]led payload spans, and help text.

use std::fmt;

use crate::{
    error::{ErrorCode, Severity},
    span::Span,
};

/// What a [`Label`] points at in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelRole {
    /// The offending key, value or line.
    Culprit,
    /// Surrounding payload that explains the culprit, e.g. the topic an
    /// entry belongs to.
    Context,
}

/// A message attached to a span of the payload body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    role: LabelRole,
}

impl Label {
    fn new(span: Span, message: impl Into<String>, role: LabelRole) -> Self {
        Self {
            span,
            message: message.into(),
            role,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn role(&self) -> LabelRole {
        self.role
    }
}

/// A diagnostic message with optional source locations.
///
/// Rendered by the command-line front end as:
///
/// ```text
/// error[E102]: subtopic of `Rust` is not a string
///   --> notes.json:3:17
///    |
///  3 |   "Rust": ["ownership", 42],
///    |                         ^^ expected a string
///    |
///    = help: subtopic lists may only contain strings
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use mindmap_parser::error::{Diagnostic, ErrorCode};
    /// # use mindmap_parser::Span;
    ///
    /// let diag = Diagnostic::error("node `A` is its own ancestor")
    ///     .with_code(ErrorCode::E200)
    ///     .with_help("a mindmap must be a tree");
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Point at the offending part of the payload.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::new(span, message, LabelRole::Culprit));
        self
    }

    /// Point at payload context, such as the topic an entry belongs to.
    pub fn with_context_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::new(span, message, LabelRole::Context));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
