//! Programmatic tree construction
//!
//! Builders allocate every node, string and table in the arena they were
//! created with, so the result is an ordinary [`Node`] that can be written,
//! compared with parsed trees or nested into other builders.
//!
//! ```
//! use arjson::{Arena, ArrayBuilder, ObjectBuilder, write};
//!
//! let arena = Arena::new();
//! let features = ArrayBuilder::new(&arena).add("auth").add("api").build();
//! let config = ObjectBuilder::new(&arena)
//!     .add("port", 8080)
//!     .add("features", features)
//!     .build();
//! assert_eq!(write(config, false), r#"{"port":8080,"features":["auth","api"]}"#);
//! ```

use crate::{
    memory::Arena,
    parser::value::{JsonStr, Node, Pair},
};
use smallvec::SmallVec;

/// Conversion of a Rust value into an arena node
pub trait IntoNode<'a> {
    fn into_node(self, arena: &'a Arena) -> &'a Node<'a>;
}

impl<'a> IntoNode<'a> for &'a Node<'a> {
    fn into_node(self, _arena: &'a Arena) -> &'a Node<'a> {
        self
    }
}

impl<'a> IntoNode<'a> for Node<'a> {
    fn into_node(self, arena: &'a Arena) -> &'a Node<'a> {
        arena.alloc_value(self)
    }
}

impl<'a> IntoNode<'a> for () {
    fn into_node(self, arena: &'a Arena) -> &'a Node<'a> {
        make_null(arena)
    }
}

impl<'a> IntoNode<'a> for bool {
    fn into_node(self, arena: &'a Arena) -> &'a Node<'a> {
        make_bool(arena, self)
    }
}

impl<'a> IntoNode<'a> for f64 {
    fn into_node(self, arena: &'a Arena) -> &'a Node<'a> {
        make_number(arena, self)
    }
}

impl<'a> IntoNode<'a> for i32 {
    fn into_node(self, arena: &'a Arena) -> &'a Node<'a> {
        make_number(arena, f64::from(self))
    }
}

impl<'a> IntoNode<'a> for u32 {
    fn into_node(self, arena: &'a Arena) -> &'a Node<'a> {
        make_number(arena, f64::from(self))
    }
}

/// Magnitudes above 2^53 are rounded to the nearest double
impl<'a> IntoNode<'a> for i64 {
    fn into_node(self, arena: &'a Arena) -> &'a Node<'a> {
        make_number(arena, self as f64)
    }
}

impl<'a> IntoNode<'a> for &str {
    fn into_node(self, arena: &'a Arena) -> &'a Node<'a> {
        make_string(arena, self)
    }
}

/// `None` becomes `null`
impl<'a, T: IntoNode<'a>> IntoNode<'a> for Option<T> {
    fn into_node(self, arena: &'a Arena) -> &'a Node<'a> {
        match self {
            Some(value) => value.into_node(arena),
            None => make_null(arena),
        }
    }
}

pub fn make_null(arena: &Arena) -> &Node<'_> {
    arena.alloc_value(Node::Null)
}

pub fn make_bool(arena: &Arena, value: bool) -> &Node<'_> {
    arena.alloc_value(Node::Bool(value))
}

pub fn make_number(arena: &Arena, value: f64) -> &Node<'_> {
    arena.alloc_value(Node::Number(value))
}

/// String node with content copied into the arena
pub fn make_string<'a>(arena: &'a Arena, value: &str) -> &'a Node<'a> {
    let content = arena.alloc_str(value);
    arena.alloc_value(Node::String(JsonStr::Arena(content)))
}

/// Array node from any sequence of convertible values
pub fn build_array_from<'a, I>(arena: &'a Arena, values: I) -> &'a Node<'a>
where
    I: IntoIterator,
    I::Item: IntoNode<'a>,
{
    values
        .into_iter()
        .fold(ArrayBuilder::new(arena), |builder, value| builder.add(value))
        .build()
}

/// Incremental array construction
pub struct ArrayBuilder<'a> {
    arena: &'a Arena,
    elements: SmallVec<[&'a Node<'a>; 16]>,
}

impl<'a> ArrayBuilder<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self {
            arena,
            elements: SmallVec::new(),
        }
    }

    /// Append an element
    pub fn add(mut self, value: impl IntoNode<'a>) -> Self {
        self.push(value);
        self
    }

    /// Append an element through a mutable reference
    pub fn push(&mut self, value: impl IntoNode<'a>) {
        self.elements.push(value.into_node(self.arena));
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Copy the collected elements into an exact-size arena table
    pub fn build(self) -> &'a Node<'a> {
        let items = self.arena.alloc_slice_copy(&self.elements);
        self.arena.alloc_value(Node::Array(items))
    }
}

/// Incremental object construction
///
/// Members keep insertion order. Adding a key twice stores two members, the
/// same way the parser handles duplicate keys.
pub struct ObjectBuilder<'a> {
    arena: &'a Arena,
    pairs: SmallVec<[Pair<'a>; 8]>,
}

impl<'a> ObjectBuilder<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self {
            arena,
            pairs: SmallVec::new(),
        }
    }

    /// Append a member; the key is copied into the arena
    pub fn add(mut self, key: &str, value: impl IntoNode<'a>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a member through a mutable reference
    pub fn push(&mut self, key: &str, value: impl IntoNode<'a>) {
        let key = JsonStr::Arena(self.arena.alloc_str(key));
        let value = value.into_node(self.arena);
        self.pairs.push(Pair { key, value });
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Copy the collected members into an exact-size arena table
    pub fn build(self) -> &'a Node<'a> {
        let pairs = self.arena.alloc_slice_copy(&self.pairs);
        self.arena.alloc_value(Node::Object(pairs))
    }
}
