//! Dotted-path lookups into a parsed JSON tree.
//!
//! Only part of an OpenCage result is promoted to typed fields. Everything
//! else stays reachable through a path such as
//! `annotations.currency.alternate_symbols.0`: segments are separated by `.`,
//! a segment made only of ASCII digits indexes into an array and any other
//! segment is a case-sensitive object key.
//!
//! A miss is an ordinary outcome and is reported as `None`. Empty segments
//! (leading, trailing or doubled dots) never match anything.
//!
//! ```
//! use serde_json::json;
//!
//! let tree = json!({"annotations": {"currency": {"alternate_symbols": ["US$"]}}});
//! assert_eq!(
//!     ocgeo::path::get_str(&tree, "annotations.currency.alternate_symbols.0"),
//!     Some("US$")
//! );
//! assert_eq!(ocgeo::path::get(&tree, "annotations.timezone"), None);
//! ```
use serde_json::Value;

/// Read-only capabilities a parsed JSON node has to offer for path lookups
pub trait JsonNode {
    /// Field of an object by exact key
    fn field(&self, key: &str) -> Option<&Self>;
    /// Element of an array by position
    fn element(&self, index: usize) -> Option<&Self>;
    fn is_null(&self) -> bool;
    fn as_str(&self) -> Option<&str>;
    fn as_i64(&self) -> Option<i64>;
    fn as_f64(&self) -> Option<f64>;
}

impl JsonNode for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    fn element(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|arr| arr.get(index))
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }

    fn as_str(&self) -> Option<&str> {
        Value::as_str(self)
    }

    fn as_i64(&self) -> Option<i64> {
        Value::as_i64(self)
    }

    fn as_f64(&self) -> Option<f64> {
        Value::as_f64(self)
    }
}

/// One step of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Index(usize),
    Key(&'a str),
}

impl<'a> Segment<'a> {
    /// Classify a raw segment. Empty segments and all-digit segments too
    /// large for `usize` select nothing.
    fn parse(raw: &'a str) -> Option<Segment<'a>> {
        if raw.is_empty() {
            None
        } else if raw.bytes().all(|b| b.is_ascii_digit()) {
            raw.parse().ok().map(Segment::Index)
        } else {
            Some(Segment::Key(raw))
        }
    }
}

/// Split a path into its segments; `None` if any segment can never match
pub fn parse(path: &str) -> Option<Vec<Segment<'_>>> {
    path.split('.').map(Segment::parse).collect()
}

/// Walk `path` from `node` and return the node it addresses, if any
pub fn get<'a, N: JsonNode>(node: &'a N, path: &str) -> Option<&'a N> {
    let mut current = node;
    for raw in path.split('.') {
        if current.is_null() {
            return None;
        }
        current = match Segment::parse(raw)? {
            Segment::Index(i) => current.element(i)?,
            Segment::Key(k) => current.field(k)?,
        };
    }
    Some(current)
}

/// String leaf at `path`; `None` when missing, null or not a string
pub fn get_str<'a, N: JsonNode>(node: &'a N, path: &str) -> Option<&'a str> {
    get(node, path).and_then(JsonNode::as_str)
}

/// Integer leaf at `path`; numbers with a fractional part do not qualify
pub fn get_i64<N: JsonNode>(node: &N, path: &str) -> Option<i64> {
    get(node, path).and_then(JsonNode::as_i64)
}

/// Numeric leaf at `path`, integer or not
pub fn get_f64<N: JsonNode>(node: &N, path: &str) -> Option<f64> {
    get(node, path).and_then(JsonNode::as_f64)
}
