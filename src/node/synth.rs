//! Programmatic construction of node trees.

use super::{Forest, Node, NodeId};

/// Indent step used when a synthesized child would not sit deeper than its parent.
pub const SYNTH_INDENT: usize = 4;

impl Node {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.put(key, value);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Forest {
    /// Append a new root node.
    pub fn add_root(&mut self, node: Node) -> NodeId {
        self.attach(None, node)
    }

    /// Append `node` to the body of `parent`.
    ///
    /// A child must sit deeper than its parent, so an indent that is not
    /// greater than the parent's is replaced with `parent + SYNTH_INDENT`.
    pub fn add(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let floor = self.node(parent).indent();
        if node.indent <= floor {
            node.indent = floor + SYNTH_INDENT;
        }
        self.attach(Some(parent), node)
    }
}
