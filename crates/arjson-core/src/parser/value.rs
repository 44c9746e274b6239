//! Tree node representation shared by the parser, builders and writer
//!
//! A [`Node`] is a plain `Copy` value. Its variable-length payloads (string
//! bytes, element tables, member tables) are separate arena allocations, and
//! every reference inside a tree carries the same lifetime `'a`, which the
//! parser ties to both the arena and the input buffer.

use crate::error::{AccessError, AccessResult};
use std::fmt;

/// Discriminant of a [`Node`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl NodeKind {
    /// Lowercase JSON type name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// String payload with its storage mode
///
/// `Borrowed` content is a zero-copy view into the parsed input buffer and is
/// produced for strings without escape sequences. `Arena` content lives in
/// arena memory: unescaped strings and everything created by the builders.
/// Equality compares content only.
#[derive(Debug, Clone, Copy)]
pub enum JsonStr<'a> {
    /// View into the original input
    Borrowed(&'a str),
    /// Arena-owned bytes
    Arena(&'a str),
}

impl<'a> JsonStr<'a> {
    /// String content
    pub fn as_str(&self) -> &'a str {
        match *self {
            JsonStr::Borrowed(s) | JsonStr::Arena(s) => s,
        }
    }

    /// Whether the content aliases the input buffer
    pub fn is_borrowed(&self) -> bool {
        matches!(self, JsonStr::Borrowed(_))
    }

    /// Content length in bytes
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// Check if the string is empty
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl PartialEq for JsonStr<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for JsonStr<'_> {}

impl PartialEq<str> for JsonStr<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for JsonStr<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for JsonStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object member; keys are not required to be unique
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair<'a> {
    pub key: JsonStr<'a>,
    pub value: &'a Node<'a>,
}

/// JSON value
///
/// Numbers are IEEE-754 doubles. Objects keep their members in input order,
/// duplicates included.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Node<'a> {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(JsonStr<'a>),
    Array(&'a [&'a Node<'a>]),
    Object(&'a [Pair<'a>]),
}

impl<'a> Node<'a> {
    /// Variant of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Bool(_) => NodeKind::Bool,
            Node::Number(_) => NodeKind::Number,
            Node::String(_) => NodeKind::String,
            Node::Array(_) => NodeKind::Array,
            Node::Object(_) => NodeKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Node::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Node::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Node::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Node::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    /// Get value as bool
    pub fn as_bool(&self) -> AccessResult<bool> {
        match *self {
            Node::Bool(b) => Ok(b),
            _ => Err(self.mismatch(NodeKind::Bool)),
        }
    }

    /// Get value as f64
    pub fn as_number(&self) -> AccessResult<f64> {
        match *self {
            Node::Number(n) => Ok(n),
            _ => Err(self.mismatch(NodeKind::Number)),
        }
    }

    /// Get string content
    pub fn as_str(&self) -> AccessResult<&'a str> {
        self.as_json_str().map(|s| s.as_str())
    }

    /// Get string payload together with its storage mode
    pub fn as_json_str(&self) -> AccessResult<JsonStr<'a>> {
        match *self {
            Node::String(s) => Ok(s),
            _ => Err(self.mismatch(NodeKind::String)),
        }
    }

    /// Get array elements
    pub fn as_array(&self) -> AccessResult<&'a [&'a Node<'a>]> {
        match *self {
            Node::Array(items) => Ok(items),
            _ => Err(self.mismatch(NodeKind::Array)),
        }
    }

    /// Get object members in input order
    pub fn as_object(&self) -> AccessResult<&'a [Pair<'a>]> {
        match *self {
            Node::Object(pairs) => Ok(pairs),
            _ => Err(self.mismatch(NodeKind::Object)),
        }
    }

    /// Number of array elements or object members
    pub fn len(&self) -> AccessResult<usize> {
        match *self {
            Node::Array(items) => Ok(items.len()),
            Node::Object(pairs) => Ok(pairs.len()),
            _ => Err(self.mismatch(NodeKind::Array)),
        }
    }

    /// Check if a container has no children
    pub fn is_empty(&self) -> AccessResult<bool> {
        self.len().map(|len| len == 0)
    }

    /// Array element at `index`
    pub fn get(&self, index: usize) -> AccessResult<&'a Node<'a>> {
        let items = self.as_array()?;
        items.get(index).copied().ok_or(AccessError::OutOfBounds {
            index,
            len: items.len(),
        })
    }

    /// Object member value by key
    ///
    /// Linear scan over the members, so only suited to small objects. When a
    /// key occurs more than once the last member wins; [`Node::get_all`]
    /// yields every match.
    pub fn get_key(&self, key: &str) -> AccessResult<&'a Node<'a>> {
        self.as_object()?
            .iter()
            .rev()
            .find(|pair| pair.key == key)
            .map(|pair| pair.value)
            .ok_or_else(|| AccessError::KeyNotFound(key.to_owned()))
    }

    /// All member values stored under `key`, in input order
    pub fn get_all<'k>(
        &self,
        key: &'k str,
    ) -> AccessResult<impl Iterator<Item = &'a Node<'a>> + use<'a, 'k>> {
        Ok(self
            .as_object()?
            .iter()
            .filter(move |pair| pair.key == key)
            .map(|pair| pair.value))
    }

    /// Check if an object has a member named `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.as_object()
            .map(|pairs| pairs.iter().any(|pair| pair.key == key))
            .unwrap_or(false)
    }

    /// Iterate over array elements; empty for non-arrays
    pub fn iter(&self) -> impl Iterator<Item = &'a Node<'a>> + use<'a> {
        let items: &'a [&'a Node<'a>] = match *self {
            Node::Array(items) => items,
            _ => &[],
        };
        items.iter().copied()
    }

    /// Iterate over object members; empty for non-objects
    pub fn pairs(&self) -> impl Iterator<Item = (&'a str, &'a Node<'a>)> + use<'a> {
        let pairs: &'a [Pair<'a>] = match *self {
            Node::Object(pairs) => pairs,
            _ => &[],
        };
        pairs.iter().map(|pair| (pair.key.as_str(), pair.value))
    }

    fn mismatch(&self, expected: NodeKind) -> AccessError {
        AccessError::TypeMismatch {
            expected,
            actual: self.kind(),
        }
    }
}
