//! # XML to JSON conversion with configurable sibling grouping
//!
//! This crate converts a well-formed XML document into an indented JSON
//! document. By default every element becomes either a scalar (when it has
//! nothing but text) or an object field on its parent; grouping rules
//! registered per tag name reshape repeated siblings into JSON arrays or
//! attribute-keyed JSON objects instead.
//!
//! ## Pipeline
//!
//! A conversion runs as one synchronous pass per call:
//!
//! 1. **Tree building** — `quick-xml` events are folded into an in-memory
//!    element tree (the whole input is read before anything is written).
//! 2. **Grouping** — a post-order transform partitions each node's direct
//!    children according to the registered rules.
//! 3. **Serialization** — a recursive walk emits the grouped tree through a
//!    streaming JSON writer, inferring JSON numbers for integer-shaped text
//!    and attribute values.
//!
//! ## Shaping rules
//!
//! | XML | JSON |
//! |-----|------|
//! | `<a>42</a>` | `{"a": 42}` |
//! | `<a>007</a>` | `{"a": "007"}` (leading zero stays a string) |
//! | `<a k="v">…</a>` | `{"a": {"k": "v", …}}` |
//! | `<a><i>1</i><i>2</i></a>` + `group_as_array("i")` | `{"a": {"i": [1, 2]}}` |
//! | `<a><i id="x"/></a>` + `group_by_id("i")` | `{"a": {"i": {"x": ""}}}` |
//!
//! Namespace prefixes and declarations are discarded; only local names are
//! used. Only unsigned integers without leading zeros are inferred as
//! numbers, and values beyond the representable range fall back to strings.
//!
//! ## Examples
//!
//! ```
//! use xml2json::{Config, Converter};
//!
//! # fn main() -> xml2json::Result<()> {
//! let mut config = Config::new();
//! config.group_as_array("item")?;
//! let converter = Converter::new(config);
//!
//! let json = converter.convert_str("<list><item>1</item><item>two</item></list>")?;
//! assert_eq!(json, "{\n  \"list\": {\n    \"item\": [\n      1,\n      \"two\"\n    ]\n  }\n}");
//! # Ok(())
//! # }
//! ```
//!
//! A [`Converter`] is read-only during conversion, so it can be shared
//! across threads once configured.

pub mod config;
mod convert;
pub mod error;
mod group;
mod json;
mod ser;
mod tree;

pub use config::{Config, GroupingRule};
pub use convert::Converter;
pub use error::{Error, Result};
