//! Structural statistics over a tree

use crate::parser::value::Node;
use std::fmt;

/// Node counts per variant and nesting depth of a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    pub total: usize,
    pub objects: usize,
    pub arrays: usize,
    pub strings: usize,
    pub numbers: usize,
    pub bools: usize,
    pub nulls: usize,
    /// Deepest node; the root is at depth 0
    pub max_depth: usize,
}

impl NodeStats {
    /// Walk the whole tree rooted at `root`
    pub fn collect(root: &Node<'_>) -> Self {
        let mut stats = Self::default();
        stats.visit(root, 0);
        stats
    }

    fn visit(&mut self, node: &Node<'_>, depth: usize) {
        self.total += 1;
        self.max_depth = self.max_depth.max(depth);
        match node {
            Node::Null => self.nulls += 1,
            Node::Bool(_) => self.bools += 1,
            Node::Number(_) => self.numbers += 1,
            Node::String(_) => self.strings += 1,
            Node::Array(items) => {
                self.arrays += 1;
                for item in items.iter() {
                    self.visit(item, depth + 1);
                }
            }
            Node::Object(pairs) => {
                self.objects += 1;
                for pair in pairs.iter() {
                    self.visit(pair.value, depth + 1);
                }
            }
        }
    }
}

impl fmt::Display for NodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total nodes: {}", self.total)?;
        writeln!(f, "  Objects:   {}", self.objects)?;
        writeln!(f, "  Arrays:    {}", self.arrays)?;
        writeln!(f, "  Strings:   {}", self.strings)?;
        writeln!(f, "  Numbers:   {}", self.numbers)?;
        writeln!(f, "  Booleans:  {}", self.bools)?;
        writeln!(f, "  Nulls:     {}", self.nulls)?;
        write!(f, "Max depth: {}", self.max_depth)
    }
}
