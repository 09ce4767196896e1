//! Decoding of JSON and text payload bodies into [`RawPayload`].
//!
//! Accepted bodies:
//!
//! - `{"mindmap": X}` where `X` is an object or a string: decodes `X`;
//! - `{"markdown": "..."}` or `{"text": "..."}`: outline text;
//! - an object with a string `name` and optional `children`: explicit tree,
//!   where each child is another such object or a bare string (a leaf);
//! - an object whose values are all arrays: topic mapping, every array entry
//!   must be a string;
//! - a JSON string: outline text.

use log::debug;
use serde_json::{Map, Value};

use mindmap_core::payload::{DictOfLists, ExplicitNodeId, ExplicitTree, RawPayload};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

/// Envelope key wrapping a whole payload.
const MINDMAP_KEY: &str = "mindmap";
/// Envelope keys wrapping outline text.
const TEXT_KEYS: [&str; 2] = ["markdown", "text"];

/// Decode a JSON payload body.
///
/// # Errors
///
/// - [`ErrorCode::E001`] if `src` is not valid JSON;
/// - [`ErrorCode::E100`] if the value has none of the accepted shapes;
/// - [`ErrorCode::E101`] for malformed explicit-tree nodes;
/// - [`ErrorCode::E102`] for subtopic entries that are not strings.
///
/// # Examples
///
/// ```
/// use mindmap_core::payload::RawPayload;
/// use mindmap_parser::decode_json;
///
/// let payload = decode_json(r#"{"A": ["x", "y"], "B": ["z"]}"#).unwrap();
/// let RawPayload::DictOfLists(map) = payload else { panic!("expected a mapping") };
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["A", "B"]);
/// ```
pub fn decode_json(src: &str) -> Result<RawPayload, ParseError> {
    let value: Value = serde_json::from_str(src).map_err(|err| invalid_json(src, &err))?;

    let payload = decode_value(unwrap_envelope(&value), src)?;
    debug!(kind:% = payload.kind(); "Payload decoded");
    Ok(payload)
}

/// Decode a payload body that may be JSON or bare outline text.
///
/// Input starting with `{`, `[` or `"` (after whitespace) is decoded as JSON;
/// anything else is taken verbatim as outline text.
pub fn decode_auto(src: &str) -> Result<RawPayload, ParseError> {
    match src.trim_start().chars().next() {
        Some('{' | '[' | '"') => decode_json(src),
        _ => {
            debug!(bytes = src.len(); "Payload is not JSON, using it as outline text");
            Ok(RawPayload::OutlineText(src.to_string()))
        }
    }
}

/// Strip `{"mindmap": X}` envelopes, however deeply nested.
fn unwrap_envelope(mut value: &Value) -> &Value {
    while let Value::Object(object) = value {
        match object.get(MINDMAP_KEY) {
            Some(inner @ (Value::Object(_) | Value::String(_))) if object.len() == 1 => {
                value = inner;
            }
            _ => break,
        }
    }
    value
}

fn decode_value(value: &Value, src: &str) -> Result<RawPayload, ParseError> {
    match value {
        Value::String(text) => Ok(RawPayload::OutlineText(text.clone())),
        Value::Object(object) => decode_object(object, src),
        other => Err(unrecognised_shape(json_type(other))),
    }
}

fn decode_object(object: &Map<String, Value>, src: &str) -> Result<RawPayload, ParseError> {
    if object.len() == 1 {
        for key in TEXT_KEYS {
            if let Some(Value::String(text)) = object.get(key) {
                return Ok(RawPayload::OutlineText(text.clone()));
            }
        }
    }

    if let Some(Value::String(name)) = object.get("name") {
        return decode_explicit(name, object).map(RawPayload::ExplicitTree);
    }

    if object.values().all(Value::is_array) {
        return decode_dict(object, src).map(RawPayload::DictOfLists);
    }

    Err(unrecognised_shape("object"))
}

fn decode_dict(object: &Map<String, Value>, src: &str) -> Result<DictOfLists, ParseError> {
    let mut collector = DiagnosticCollector::new();
    let mut map = DictOfLists::with_capacity(object.len());

    for (topic, value) in object {
        let entries = value.as_array().map(Vec::as_slice).unwrap_or_default();
        let mut subtopics = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match entry {
                Value::String(subtopic) => subtopics.push(subtopic.clone()),
                other => {
                    let mut diagnostic = Diagnostic::error(format!(
                        "subtopic {index} of `{topic}` is {}, not a string",
                        json_type(other)
                    ))
                    .with_code(ErrorCode::E102)
                    .with_help("subtopic lists may only contain strings");
                    if let Some(span) = key_span(src, topic) {
                        diagnostic = diagnostic.with_context_label(span, "in this topic");
                    }
                    collector.emit(diagnostic);
                }
            }
        }
        map.insert(topic.clone(), subtopics);
    }

    collector.finish()?;
    Ok(map)
}

fn decode_explicit(root_name: &str, root: &Map<String, Value>) -> Result<ExplicitTree, ParseError> {
    let mut collector = DiagnosticCollector::new();
    let mut tree = ExplicitTree::leaf(root_name);

    let mut stack: Vec<(&Map<String, Value>, ExplicitNodeId, String)> =
        vec![(root, tree.root(), "root".to_string())];

    while let Some((object, id, path)) = stack.pop() {
        let children = match object.get("children") {
            None | Some(Value::Null) => continue,
            Some(Value::Array(children)) => children,
            Some(other) => {
                collector.emit(invalid_node(format!(
                    "`children` of {path} is {}, not an array",
                    json_type(other)
                )));
                continue;
            }
        };

        let mut pending = Vec::new();
        for (index, child) in children.iter().enumerate() {
            let child_path = format!("{path}.children[{index}]");
            match child {
                Value::String(name) => {
                    tree.push_child(id, name.as_str());
                }
                Value::Object(node) => match node.get("name") {
                    Some(Value::String(name)) => {
                        let child_id = tree.push_child(id, name.as_str());
                        pending.push((node, child_id, child_path));
                    }
                    _ => collector.emit(invalid_node(format!(
                        "{child_path} has no string `name`"
                    ))),
                },
                other => collector.emit(invalid_node(format!(
                    "{child_path} is {}, not a node or a string",
                    json_type(other)
                ))),
            }
        }
        stack.extend(pending.into_iter().rev());
    }

    collector.finish()?;
    Ok(tree)
}

/// Locate the first occurrence of `key` as a JSON string in `src`.
/// Span of `key` where it appears as an object key, i.e. followed by `:`.
fn key_span(src: &str, key: &str) -> Option<Span> {
    let quoted = serde_json::to_string(key).ok()?;
    src.match_indices(&quoted)
        .find(|(start, _)| src[start + quoted.len()..].trim_start().starts_with(':'))
        .map(|(start, _)| Span::new(start..start + quoted.len()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn invalid_json(src: &str, err: &serde_json::Error) -> ParseError {
    let span = Span::at_line_column(src, err.line(), err.column(), 1);
    Diagnostic::error(format!("invalid JSON: {err}"))
        .with_code(ErrorCode::E001)
        .with_label(span, "here")
        .into()
}

fn unrecognised_shape(found: &str) -> ParseError {
    Diagnostic::error(format!("unrecognised payload shape: found {found}"))
        .with_code(ErrorCode::E100)
        .with_help(
            "expected a topic mapping, a `{ \"name\", \"children\" }` tree, \
             outline text or a `mindmap`/`markdown` envelope",
        )
        .into()
}

fn invalid_node(message: String) -> Diagnostic {
    Diagnostic::error(message)
        .with_code(ErrorCode::E101)
        .with_help("tree nodes are objects with a string `name` and an optional `children` array")
}
