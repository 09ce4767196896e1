//! Outline text parser.
//!
//! Turns heading/list/indentation delimited text into a [`CanonicalTree`].
//! Each non-blank line is classified with small `winnow` parsers and gets a
//! *source level*:
//!
//! - an ATX heading `#`..`######` has level `hashes - 1`;
//! - a list item (`-`, `*`, `+`, `1.`, `1)`) or a plain text line has level
//!   `heading_base + indent_level`, where `heading_base` is one more than the
//!   level of the last heading seen (0 before any heading) and
//!   `indent_level` comes from the indentation columns in effect.
//!
//! Lines attach to the most recent line with a strictly smaller source level,
//! so skipped levels are clamped and malformed outlines still produce a tree.

use log::{debug, trace};
use winnow::{
    Parser as _,
    ascii::{digit1, space1},
    combinator::{alt, eof, opt, terminated},
    error::{ContextError, ErrMode},
    token::{one_of, take_while},
};

use mindmap_core::{
    identifier::NodeId,
    tree::{CanonicalTree, TreeBuilder},
};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    span::Span,
};

type Input<'src> = &'src str;
type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Columns a tab advances the indentation by.
const TAB_WIDTH: usize = 4;

/// Deepest ATX heading.
const MAX_HEADING_HASHES: usize = 6;

/// Classification of one outline line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    /// ATX heading with its zero-based level.
    Heading(usize),
    ListItem,
    Text,
}

/// A classified outline line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OutlineLine<'src> {
    kind: LineKind,
    /// Indentation width in columns.
    indent: usize,
    label: &'src str,
    span: Span,
}

/// A line with its resolved source level.
#[derive(Debug)]
struct LeveledLine<'src> {
    level: usize,
    label: &'src str,
    span: Span,
}

/// Parse `#`..`######` followed by whitespace or end of line.
///
/// Returns the zero-based heading level.
fn heading_marker<'src>(input: &mut Input<'src>) -> IResult<usize> {
    terminated(
        take_while(1..=MAX_HEADING_HASHES, '#'),
        alt((space1.void(), eof.void())),
    )
    .map(|hashes: &str| hashes.len() - 1)
    .parse_next(input)
}

/// Parse a bullet or ordered list marker followed by whitespace or end of line.
fn list_marker<'src>(input: &mut Input<'src>) -> IResult<()> {
    terminated(
        alt((one_of(['-', '*', '+']).void(), (digit1, one_of(['.', ')'])).void())),
        alt((space1.void(), eof.void())),
    )
    .void()
    .parse_next(input)
}

/// Parse leading spaces and tabs, returning the indentation width in columns.
fn indentation<'src>(input: &mut Input<'src>) -> IResult<usize> {
    take_while(0.., [' ', '\t'])
        .map(|ws: &str| {
            ws.chars()
                .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
                .sum()
        })
        .parse_next(input)
}

/// Classify a single non-blank line.
///
/// `offset` is the byte offset of the line in the whole source.
fn classify_line(line: &str, offset: usize) -> IResult<OutlineLine<'_>> {
    let mut input = line;
    let indent = indentation.parse_next(&mut input)?;

    let kind = opt(alt((
        heading_marker.map(LineKind::Heading),
        list_marker.value(LineKind::ListItem),
    )))
    .parse_next(&mut input)?
    .unwrap_or(LineKind::Text);

    let mut label = input.trim();
    if let LineKind::Heading(_) = kind {
        label = strip_closing_hashes(label);
    }

    let start = offset + (line.len() - line.trim_start().len());
    Ok(OutlineLine {
        kind,
        indent,
        label: strip_emphasis(label),
        span: Span::new(start..offset + line.trim_end().len()),
    })
}

/// Strip an optional closing `#` run from a heading label.
///
/// The run only counts as closing when it is the whole label or follows
/// whitespace, so `C#` keeps its hash.
fn strip_closing_hashes(label: &str) -> &str {
    let stripped = label.trim_end_matches('#');
    if stripped.len() == label.len() {
        return label;
    }
    if stripped.is_empty() || stripped.ends_with([' ', '\t']) {
        stripped.trim_end()
    } else {
        label
    }
}

/// Strip emphasis markers that wrap the whole label.
fn strip_emphasis(label: &str) -> &str {
    ["**", "__", "*"]
        .into_iter()
        .filter_map(|marker| label.strip_prefix(marker)?.strip_suffix(marker))
        .map(str::trim)
        .find(|inner| !inner.is_empty())
        .unwrap_or(label)
}

/// Tracks indentation columns between headings.
#[derive(Debug, Default)]
struct IndentStack {
    columns: Vec<usize>,
}

impl IndentStack {
    /// Returns the nesting level for a line indented by `column`.
    ///
    /// A deeper column opens a new level, an equal column reuses its level
    /// and a shallower one closes levels down to the nearest column that is
    /// not deeper than it.
    fn level(&mut self, column: usize) -> usize {
        while self.columns.last().is_some_and(|&top| top > column) {
            self.columns.pop();
        }
        if self.columns.last() != Some(&column) {
            self.columns.push(column);
        }
        self.columns.len() - 1
    }

    fn reset(&mut self) {
        self.columns.clear();
    }
}

/// Classify every non-blank line and resolve its source level.
fn leveled_lines(text: &str) -> Result<Vec<LeveledLine<'_>>, ParseError> {
    let mut lines = Vec::new();
    let mut indents = IndentStack::default();
    let mut heading_base = 0;
    let mut offset = 0;

    for raw in text.split_inclusive('\n') {
        let line_offset = offset;
        offset += raw.len();

        let line = raw.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }

        let classified = classify_line(line, line_offset).map_err(|err| {
            Diagnostic::error(format!("cannot classify outline line: {err}"))
                .with_code(ErrorCode::E300)
                .with_label(Span::new(line_offset..line_offset + line.len()), "here")
        })?;

        let level = match classified.kind {
            LineKind::Heading(level) => {
                heading_base = level + 1;
                indents.reset();
                level
            }
            LineKind::ListItem | LineKind::Text => heading_base + indents.level(classified.indent),
        };

        lines.push(LeveledLine {
            level,
            label: classified.label,
            span: classified.span,
        });
    }

    Ok(lines)
}

/// Parse outline text into a canonical tree.
///
/// Blank lines are ignored. Empty input yields a single root with an empty
/// label. A synthetic root with an empty label is created when the first
/// line is not at level 0 or when there is more than one top-level line.
///
/// # Errors
///
/// Returns [`ErrorCode::E300`] if a line cannot be given a parent. Clamping
/// makes this unreachable for any text input.
///
/// # Examples
///
/// ```
/// use mindmap_parser::parse_outline;
///
/// let tree = parse_outline("# Root\n## Child1\n## Child2\n### Grandchild").unwrap();
/// assert_eq!(tree.root().label(), "Root");
/// assert_eq!(tree.max_depth(), 2);
/// ```
pub fn parse_outline(text: &str) -> Result<CanonicalTree, ParseError> {
    let lines = leveled_lines(text)?;
    let Some(first) = lines.first() else {
        debug!("Empty outline, using an empty root");
        return Ok(CanonicalTree::leaf(""));
    };

    // Parent of each line (as a line index), found with a stack of open lines.
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(lines.len());
    let mut open: Vec<usize> = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        while open.last().is_some_and(|&top| lines[top].level >= line.level) {
            open.pop();
        }
        parents.push(open.last().copied());
        open.push(index);
    }

    let top_level = parents.iter().filter(|parent| parent.is_none()).count();
    let synthetic_root = first.level != 0 || top_level > 1;
    debug!(lines = lines.len(), top_level, synthetic_root; "Outline lines leveled");

    let mut builder = TreeBuilder::new(if synthetic_root { "" } else { first.label });
    let mut ids: Vec<Option<NodeId>> = vec![None; lines.len()];
    let skip = if synthetic_root {
        0
    } else {
        ids[0] = Some(builder.root());
        1
    };

    for (index, line) in lines.iter().enumerate().skip(skip) {
        let parent = match parents[index] {
            None => Some(builder.root()),
            Some(parent_line) => ids[parent_line],
        };
        let parent = parent.ok_or_else(|| {
            Diagnostic::error(format!("outline line `{}` has no parent", line.label))
                .with_code(ErrorCode::E300)
                .with_label(line.span, "cannot attach this line")
        })?;
        ids[index] = Some(builder.add_child(parent, line.label));
    }

    let tree = builder.build();
    trace!(tree:?; "Parsed outline tree");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(tree: &CanonicalTree) -> Vec<(usize, &str)> {
        tree.iter_pre_order()
            .map(|node| (node.depth(), node.label()))
            .collect()
    }

    #[test]
    fn test_heading_marker() {
        let mut input = "### Title";
        assert_eq!(heading_marker(&mut input).unwrap(), 2);
        assert_eq!(input, "Title");

        let mut input = "#";
        assert_eq!(heading_marker(&mut input).unwrap(), 0);

        assert!(heading_marker(&mut "#hashtag").is_err());
        assert!(heading_marker(&mut "####### seven").is_err());
    }

    #[test]
    fn test_list_marker() {
        for marker in ["- a", "* a", "+ a", "1. a", "12) a"] {
            let mut input = marker;
            assert!(list_marker(&mut input).is_ok(), "{marker}");
            assert_eq!(input, "a");
        }
        assert!(list_marker(&mut "**bold**").is_err());
        assert!(list_marker(&mut "1.5 litres").is_err());
    }

    #[test]
    fn test_indentation_counts_tabs() {
        let mut input = "\t  - x";
        assert_eq!(indentation(&mut input).unwrap(), 6);
        assert_eq!(input, "- x");
    }

    #[test]
    fn test_strip_closing_hashes() {
        assert_eq!(strip_closing_hashes("Title ##"), "Title");
        assert_eq!(strip_closing_hashes("C#"), "C#");
        assert_eq!(strip_closing_hashes("###"), "");
    }

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(strip_emphasis("**Bold**"), "Bold");
        assert_eq!(strip_emphasis("__Under__"), "Under");
        assert_eq!(strip_emphasis("*Soft*"), "Soft");
        assert_eq!(strip_emphasis("**"), "**");
        assert_eq!(strip_emphasis("a **b** c"), "a **b** c");
    }

    #[test]
    fn test_indent_stack() {
        let mut stack = IndentStack::default();
        assert_eq!(stack.level(0), 0);
        assert_eq!(stack.level(2), 1);
        assert_eq!(stack.level(4), 2);
        assert_eq!(stack.level(2), 1);
        assert_eq!(stack.level(0), 0);
        // Between two known columns counts as deeper than the shallower one.
        assert_eq!(stack.level(4), 1);
        assert_eq!(stack.level(2), 1);
    }

    #[test]
    fn test_empty_input() {
        for text in ["", "\n\n", "   \n\t\n"] {
            let tree = parse_outline(text).unwrap();
            assert_eq!(tree.node_count(), 1);
            assert_eq!(tree.root().label(), "");
        }
    }

    #[test]
    fn test_single_line() {
        let tree = parse_outline("Only topic").unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.root().label(), "Only topic");

        let tree = parse_outline("# Only heading #").unwrap();
        assert_eq!(labels(&tree), [(0, "Only heading")]);
    }

    #[test]
    fn test_headings() {
        let tree = parse_outline("# Root\n## Child1\n## Child2\n### Grandchild").unwrap();
        assert_eq!(
            labels(&tree),
            [(0, "Root"), (1, "Child1"), (1, "Child2"), (2, "Grandchild")]
        );
    }

    #[test]
    fn test_lists_under_headings() {
        let text = "# Rust\n## Ownership\n- Borrowing\n  - Lifetimes\n- Moves\n## Traits\n";
        let tree = parse_outline(text).unwrap();
        assert_eq!(
            labels(&tree),
            [
                (0, "Rust"),
                (1, "Ownership"),
                (2, "Borrowing"),
                (3, "Lifetimes"),
                (2, "Moves"),
                (1, "Traits"),
            ]
        );
    }

    #[test]
    fn test_indented_list_without_headings() {
        let text = "- A\n    - A1\n    - A2\n- B\n\t- B1\n";
        let tree = parse_outline(text).unwrap();
        assert_eq!(
            labels(&tree),
            [(0, ""), (1, "A"), (2, "A1"), (2, "A2"), (1, "B"), (2, "B1")]
        );
    }

    #[test]
    fn test_skipped_levels_are_clamped() {
        let tree = parse_outline("# Root\n#### Deep\n## Shallow").unwrap();
        assert_eq!(labels(&tree), [(0, "Root"), (1, "Deep"), (1, "Shallow")]);
    }

    #[test]
    fn test_siblings_at_same_source_level_stay_siblings() {
        let tree = parse_outline("# Root\n### A\n### B").unwrap();
        assert_eq!(labels(&tree), [(0, "Root"), (1, "A"), (1, "B")]);
    }

    #[test]
    fn test_synthetic_root_for_deep_first_line() {
        let tree = parse_outline("## Child\n### Grandchild").unwrap();
        assert_eq!(labels(&tree), [(0, ""), (1, "Child"), (2, "Grandchild")]);
    }

    #[test]
    fn test_synthetic_root_for_many_top_level_lines() {
        let tree = parse_outline("# One\n# Two\n## Two.a").unwrap();
        assert_eq!(
            labels(&tree),
            [(0, ""), (1, "One"), (1, "Two"), (2, "Two.a")]
        );
    }

    #[test]
    fn test_crlf_and_emphasis() {
        let tree = parse_outline("# **Main**\r\n- *point*\r\n").unwrap();
        assert_eq!(labels(&tree), [(0, "Main"), (1, "point")]);
    }

    #[test]
    fn test_outline_roundtrip() {
        let tree = parse_outline("# Root\n## A\n### A1\n## B").unwrap();
        let reparsed = parse_outline(&tree.to_outline()).unwrap();
        assert_eq!(tree, reparsed);
    }
}
