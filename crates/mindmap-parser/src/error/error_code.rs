//! Error codes for mindmap payload diagnostics.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Decoding errors
//! - `E1xx` - Payload shape errors
//! - `E2xx` - Tree structure errors
//! - `E3xx` - Outline errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Decoding Errors (E0xx)
    // =========================================================================
    /// Invalid JSON.
    ///
    /// The payload looked like JSON but could not be decoded.
    E001,

    // =========================================================================
    // Shape Errors (E1xx)
    // =========================================================================
    /// Unrecognised payload shape.
    ///
    /// The JSON value is neither a topic mapping, an explicit tree, an
    /// envelope nor a string.
    E100,

    /// Invalid explicit-tree node.
    ///
    /// A node has no string `name`, or its `children` is not an array of
    /// nodes and strings.
    E101,

    /// Non-string subtopic.
    ///
    /// A topic mapping lists something other than a string as a subtopic.
    E102,

    // =========================================================================
    // Structure Errors (E2xx)
    // =========================================================================
    /// Cycle in an explicit tree.
    ///
    /// A node is its own ancestor (including a node listing itself as a child).
    E200,

    /// Shared node in an explicit tree.
    ///
    /// A node is reachable through two different parents.
    E201,

    // =========================================================================
    // Outline Errors (E3xx)
    // =========================================================================
    /// Outline line without a parent.
    ///
    /// A line could not be attached anywhere in the tree.
    E300,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E300 => "E300",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "invalid JSON",
            ErrorCode::E100 => "unrecognised payload shape",
            ErrorCode::E101 => "invalid tree node",
            ErrorCode::E102 => "non-string subtopic",
            ErrorCode::E200 => "cycle in tree",
            ErrorCode::E201 => "node has several parents",
            ErrorCode::E300 => "outline line without parent",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E102.to_string(), "E102");
        assert_eq!(ErrorCode::E201.to_string(), "E201");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "invalid JSON");
        assert_eq!(ErrorCode::E200.description(), "cycle in tree");
        assert_eq!(ErrorCode::E300.description(), "outline line without parent");
    }
}
