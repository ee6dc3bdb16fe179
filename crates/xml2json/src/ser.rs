//! Recursive serializer walking the grouped tree into the JSON sink.

use std::io::{self, Write};

use crate::error::{Error, Result};
use crate::json::JsonWriter;
use crate::tree::Node;

/// Emits the document wrapper node.
///
/// The wrapper has no attributes and exactly one plain child (or one group,
/// when the root tag itself is grouped), so the output is always a single
/// JSON object with one top-level key: the root element's tag name.
pub fn emit_document<W: Write>(root: &Node, out: &mut JsonWriter<W>) -> Result<()> {
    let mut path = Vec::new();
    emit(root, out, &mut path)
}

fn emit<'n, W: Write>(
    node: &'n Node,
    out: &mut JsonWriter<W>,
    path: &mut Vec<&'n str>,
) -> Result<()> {
    // The unnamed wrapper contributes nothing to the diagnostic path.
    if !node.name.is_empty() {
        path.push(&node.name);
    }
    let result = emit_value(node, out, path);
    if !node.name.is_empty() {
        path.pop();
    }
    result
}

fn emit_value<'n, W: Write>(
    node: &'n Node,
    out: &mut JsonWriter<W>,
    path: &mut Vec<&'n str>,
) -> Result<()> {
    if node.is_leaf() {
        return scalar(node.text.trim(), out, path);
    }

    // Fixed member order: attributes, plain children, array groups, keyed
    // groups. Text content of non-leaf elements is not carried over.
    sink(out.begin_object(), path)?;

    for (key, value) in &node.attributes {
        sink(out.field_name(key), path)?;
        scalar(value, out, path)?;
    }

    // Repeated untransformed siblings intentionally produce repeated keys.
    for child in &node.children {
        sink(out.field_name(&child.name), path)?;
        emit(child, out, path)?;
    }

    for (name, members) in &node.array_groups {
        sink(out.field_name(name), path)?;
        sink(out.begin_array(), path)?;
        for member in members {
            emit(member, out, path)?;
        }
        sink(out.end_array(), path)?;
    }

    for (name, members) in &node.keyed_groups {
        sink(out.field_name(name), path)?;
        sink(out.begin_object(), path)?;
        for (key, member) in members {
            sink(out.field_name(key), path)?;
            emit(member, out, path)?;
        }
        sink(out.end_object(), path)?;
    }

    sink(out.end_object(), path)
}

/// Writes one scalar, inferring a JSON number for integer-literal text.
///
/// A literal whose magnitude does not fit the integer range degrades to a
/// string instead of failing the conversion.
fn scalar<W: Write>(raw: &str, out: &mut JsonWriter<W>, path: &[&str]) -> Result<()> {
    if is_integer_literal(raw) {
        match raw.parse::<i32>() {
            Ok(n) => return sink(out.number_value(n), path),
            Err(_) => {
                tracing::debug!(value = raw, "integer literal out of range, emitting string");
            }
        }
    }
    sink(out.string_value(raw), path)
}

/// Integer literal form: exactly `"0"`, or a nonzero digit followed by any
/// number of digits. No sign, decimal point, exponent, or leading zero.
fn is_integer_literal(s: &str) -> bool {
    match s.as_bytes().split_first() {
        Some((b'0', rest)) => rest.is_empty(),
        Some((b'1'..=b'9', rest)) => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

fn sink(result: io::Result<()>, path: &[&str]) -> Result<()> {
    result.map_err(|source| {
        let path = format!("/{}", path.join("/"));
        tracing::error!(%path, error = %source, "failed writing JSON output");
        Error::Io { path, source }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_literal_accepts_plain_integers() {
        assert!(is_integer_literal("0"));
        assert!(is_integer_literal("5"));
        assert!(is_integer_literal("42"));
        assert!(is_integer_literal("10300"));
        assert!(is_integer_literal("99999999999"));
    }

    #[test]
    fn test_integer_literal_rejects_everything_else() {
        assert!(!is_integer_literal(""));
        assert!(!is_integer_literal("007"));
        assert!(!is_integer_literal("00"));
        assert!(!is_integer_literal("-3"));
        assert!(!is_integer_literal("+3"));
        assert!(!is_integer_literal("1.5"));
        assert!(!is_integer_literal("1e3"));
        assert!(!is_integer_literal("42 "));
        assert!(!is_integer_literal("4x2"));
        assert!(!is_integer_literal("abc"));
    }
}
