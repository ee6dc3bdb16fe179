//! In-memory element tree materialized from streaming XML events.
//!
//! The whole document is read into a [`Node`] tree before any grouping or
//! output happens. Construction is driven by a loop over `quick-xml` events
//! with an explicit stack of open elements; the bottom of the stack is a
//! synthetic unnamed wrapper node whose single child ends up being the
//! document root element.

use std::collections::BTreeMap;
use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

/// One XML element, or the synthetic document wrapper at the top of the tree.
///
/// Ownership flows strictly parent to children; dropping the wrapper drops
/// the whole tree.
#[derive(Debug, Default)]
pub struct Node {
    /// Local tag name. Empty for the document wrapper, which is never itself
    /// emitted by name.
    pub name: String,
    /// Attribute name to raw string value. Sorted iteration keeps output
    /// deterministic.
    pub attributes: BTreeMap<String, String>,
    /// Character content directly inside this element, in document order.
    pub text: String,
    /// Child elements in document order. Drained by the grouping pass.
    pub children: Vec<Node>,
    /// Same-name siblings moved out of `children` for array-style emission,
    /// keyed by tag name. Populated only for tags grouped as arrays.
    pub array_groups: BTreeMap<String, Vec<Node>>,
    /// Same-name siblings keyed by an attribute value extracted from each
    /// member, in document order. Duplicate keys are preserved as-is.
    pub keyed_groups: BTreeMap<String, Vec<(String, Node)>>,
}

impl Node {
    fn named(name: String) -> Self {
        Node {
            name,
            ..Node::default()
        }
    }

    /// A node with no attributes, children, or groups serializes as a bare
    /// scalar instead of an object.
    pub fn is_leaf(&self) -> bool {
        self.attributes.is_empty()
            && self.children.is_empty()
            && self.array_groups.is_empty()
            && self.keyed_groups.is_empty()
    }
}

/// Reads a whole document from `reader` and returns the wrapper node.
///
/// No output is produced during this phase; a reader failure aborts the
/// conversion with [`Error::Parse`] and leaves no usable tree.
pub fn build<R: BufRead>(reader: &mut Reader<R>) -> Result<Node> {
    let mut stack = vec![Node::default()];
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                stack.push(open_element(reader, &start)?);
            }
            Event::Empty(start) => {
                let node = open_element(reader, &start)?;
                attach(&mut stack, node)?;
            }
            Event::End(end) => {
                let name = reader
                    .decoder()
                    .decode(end.name().local_name().as_ref())
                    .map_err(|e| Error::Malformed(format!("undecodable element name: {}", e)))?
                    .into_owned();
                if stack.len() < 2 {
                    return Err(Error::Malformed(format!("unbalanced closing tag </{}>", name)));
                }
                // Length checked above, so both pop and attach succeed.
                if let Some(node) = stack.pop() {
                    if node.name != name {
                        return Err(Error::Malformed(format!(
                            "closing tag </{}> does not match <{}>",
                            name, node.name
                        )));
                    }
                    attach(&mut stack, node)?;
                }
            }
            Event::Text(text) => {
                let decoded = reader
                    .decoder()
                    .decode(text.as_ref())
                    .map_err(|e| Error::Malformed(format!("undecodable text: {}", e)))?;
                let unescaped = unescape(&decoded)
                    .map_err(|e| Error::Malformed(format!("bad character data: {}", e)))?;
                append_text(&mut stack, &unescaped);
            }
            Event::CData(data) => {
                let decoded = reader
                    .decoder()
                    .decode(data.as_ref())
                    .map_err(|e| Error::Malformed(format!("undecodable CDATA: {}", e)))?;
                append_text(&mut stack, &decoded);
            }
            Event::GeneralRef(reference) => {
                let name = reader
                    .decoder()
                    .decode(reference.as_ref())
                    .map_err(|e| Error::Malformed(format!("undecodable reference: {}", e)))?;
                match resolve_reference(&name) {
                    Some(ch) => {
                        if let Some(top) = stack.last_mut() {
                            top.text.push(ch);
                        }
                    }
                    None => {
                        return Err(Error::Malformed(format!(
                            "unresolved entity reference '&{};'",
                            name
                        )));
                    }
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctype
            // carry no content for the tree.
            _ => {}
        }
    }

    if stack.len() > 1 {
        let open = stack.last().map(|n| n.name.clone()).unwrap_or_default();
        return Err(Error::Malformed(format!(
            "unexpected end of document inside <{}>",
            open
        )));
    }
    let root = stack
        .pop()
        .ok_or_else(|| Error::Malformed("empty document".to_string()))?;
    if root.children.len() != 1 {
        return Err(Error::Malformed(format!(
            "expected exactly one root element, found {}",
            root.children.len()
        )));
    }
    Ok(root)
}

/// Creates a node from a start (or empty) element event, copying attributes.
/// Namespace declarations are dropped and all names are reduced to their
/// local part.
fn open_element<R: BufRead>(reader: &Reader<R>, start: &BytesStart<'_>) -> Result<Node> {
    let name = reader
        .decoder()
        .decode(start.name().local_name().as_ref())
        .map_err(|e| Error::Malformed(format!("undecodable element name: {}", e)))?
        .into_owned();
    let mut node = Node::named(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Malformed(format!("bad attribute: {}", e)))?;
        if attr.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let key = reader
            .decoder()
            .decode(attr.key.local_name().as_ref())
            .map_err(|e| Error::Malformed(format!("undecodable attribute name: {}", e)))?
            .into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Malformed(format!("bad attribute value: {}", e)))?
            .into_owned();
        node.attributes.insert(key, value);
    }
    Ok(node)
}

fn attach(stack: &mut Vec<Node>, node: Node) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None => Err(Error::Malformed("unbalanced closing tag".to_string())),
    }
}

fn append_text(stack: &mut [Node], fragment: &str) {
    if let Some(top) = stack.last_mut() {
        top.text.push_str(fragment);
    }
}

/// Resolves predefined entity and character references. Anything else would
/// require a DTD, which is out of scope.
fn resolve_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = if let Some(hex) = digits.strip_prefix(['x', 'X']) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                digits.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
