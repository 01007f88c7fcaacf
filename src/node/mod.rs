//! The brief node tree.
//!
//! A decode produces a [`Forest`]: an arena owning every [`Node`] plus the
//! ordered list of root ids. Children are owned through their parent's body
//! list; the upward link is a plain [`NodeId`], so there is no ownership
//! cycle between a node and its children.
//!
//! Read access goes through [`NodeRef`], a cheap borrowed view that carries
//! the query operations (see [`crate::query`]). Mutation goes through the
//! forest: [`Forest::put`], [`Forest::compile`], [`Forest::add`].

mod synth;

pub use synth::SYNTH_INDENT;

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

/// Index of a node inside its [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A typed element with optional name, attributes and content.
///
/// An empty `name` or `content` means the element has none.
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Element type (the identifier that opens the line)
    pub kind: String,
    pub name: String,
    pub keys: BTreeMap<String, String>,
    pub content: String,
    /// Column at which the element's line began
    pub indent: usize,
    parent: Option<NodeId>,
    body: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(String::as_str)
    }

    /// Set a key, overwriting any previous value.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.keys.insert(key.into(), value.into());
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn body(&self) -> &[NodeId] {
        &self.body
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    pub fn has_keys(&self) -> bool {
        !self.keys.is_empty()
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    /// A childless, keyless node with content: the shape [`Forest::compile`] folds.
    pub fn is_content_only(&self) -> bool {
        !self.has_body() && !self.has_keys() && self.has_content()
    }

    pub fn indent_string(&self) -> String {
        " ".repeat(self.indent)
    }

    /// `kind` or `kind:name`.
    pub fn spec_string(&self) -> String {
        if self.has_name() {
            format!("{}:{}", self.kind, self.name)
        } else {
            self.kind.clone()
        }
    }
}

/// An ordered sequence of root nodes plus the arena that owns every node.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of root nodes.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn root_ids(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.roots.iter().map(move |&id| self.node(id))
    }

    pub fn root(&self, index: usize) -> Option<NodeRef<'_>> {
        self.roots.get(index).map(|&id| self.node(id))
    }

    /// View of a node. Panics if `id` does not belong to this forest.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.0 < self.nodes.len(), "node id {} out of range", id.0);
        NodeRef { forest: self, id }
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn put(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        self.nodes[id.0].put(key, value);
    }

    /// Insert a node as the last child of `parent`, or as the last root.
    ///
    /// The node's indent is kept as-is; callers are responsible for the
    /// strictly-greater-than-parent invariant.
    pub(crate) fn attach(&mut self, parent: Option<NodeId>, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        node.body.clear();
        self.nodes.push(node);
        match parent {
            Some(p) => self.nodes[p.0].body.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Move every root of `other` (with its subtree) under `parent`, or to the
    /// end of this forest's roots. Returns the new ids of the moved roots.
    pub fn graft(&mut self, parent: Option<NodeId>, other: Forest) -> Vec<NodeId> {
        let moved = self.absorb(other);
        for &id in &moved {
            self.link(parent, id);
        }
        moved
    }

    /// Move every node of `other` into this arena without linking its roots
    /// anywhere. Returns the new ids of `other`'s roots, in order; each must
    /// be passed to [`link`](Self::link) to become reachable.
    pub(crate) fn absorb(&mut self, other: Forest) -> Vec<NodeId> {
        let offset = self.nodes.len();
        let shift = |id: NodeId| NodeId(id.0 + offset);

        for mut node in other.nodes {
            node.parent = node.parent.map(shift);
            for child in node.body.iter_mut() {
                *child = shift(*child);
            }
            self.nodes.push(node);
        }

        other.roots.into_iter().map(shift).collect()
    }

    /// Append an unlinked node to the body of `parent`, or to the roots.
    pub(crate) fn link(&mut self, parent: Option<NodeId>, id: NodeId) {
        self.nodes[id.0].parent = parent;
        match parent {
            Some(p) => self.nodes[p.0].body.push(id),
            None => self.roots.push(id),
        }
    }

    /// Fold content-only children into the node's keys.
    ///
    /// Each child with no body, no keys and non-empty content becomes the key
    /// `name` (or `kind` when unnamed) with the content as value, and is
    /// dropped from the body. A single forward pass builds the new body, so
    /// adjacent foldable children are all folded.
    pub fn compile(&mut self, id: NodeId) {
        let body = std::mem::take(&mut self.nodes[id.0].body);
        let mut kept = Vec::with_capacity(body.len());

        for child in body {
            let folded = {
                let node = &self.nodes[child.0];
                node.is_content_only().then(|| {
                    let key = if node.has_name() { &node.name } else { &node.kind };
                    (key.clone(), node.content.clone())
                })
            };
            match folded {
                Some((key, value)) => self.nodes[id.0].put(key, value),
                None => kept.push(child),
            }
        }

        self.nodes[id.0].body = kept;
    }
}

/// Borrowed view of one node in a [`Forest`].
///
/// Equality is structural: kind, name, keys, content, indent and the body,
/// compared recursively. Two views from different forests compare equal when
/// their trees have the same shape.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    forest: &'a Forest,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn forest(&self) -> &'a Forest {
        self.forest
    }

    /// The underlying node record.
    pub fn node(&self) -> &'a Node {
        &self.forest.nodes[self.id.0]
    }

    pub fn kind(&self) -> &'a str {
        &self.node().kind
    }

    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    pub fn keys(&self) -> &'a BTreeMap<String, String> {
        &self.node().keys
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.node().get(key)
    }

    pub fn content(&self) -> &'a str {
        &self.node().content
    }

    pub fn indent(&self) -> usize {
        self.node().indent
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| self.forest.node(id))
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeRef<'a>> + ExactSizeIterator + 'a {
        let forest = self.forest;
        self.node().body.iter().map(move |&id| forest.node(id))
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        std::iter::successors(self.parent(), |node| node.parent())
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.node(), other.node());
        a.kind == b.kind
            && a.name == b.name
            && a.keys == b.keys
            && a.content == b.content
            && a.indent == b.indent
            && a.body.len() == b.body.len()
            && self.children().zip(other.children()).all(|(x, y)| x == y)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        let body: Vec<NodeRef<'_>> = self.children().collect();
        f.debug_struct("Node")
            .field("kind", &node.kind)
            .field("name", &node.name)
            .field("keys", &node.keys)
            .field("content", &node.content)
            .field("indent", &node.indent)
            .field("body", &body)
            .finish()
    }
}

/// Debug tree: one line per node, `n(kind, "name", P(parent) "content" = {keys})`.
impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        let parent = self.parent().map(|p| p.node().spec_string()).unwrap_or_default();
        write!(
            f,
            "{}n({}, {:?}, P({}) {:?} = {:?})",
            node.indent_string(),
            node.kind,
            node.name,
            parent,
            node.content,
            node.keys
        )?;
        for child in self.children() {
            write!(f, "\n{child}")?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct NodeView<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    name: &'a str,
    #[serde(skip_serializing_if = "no_keys")]
    keys: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "is_blank")]
    content: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    body: Vec<NodeRef<'a>>,
}

fn is_blank(s: &&str) -> bool {
    s.is_empty()
}

fn no_keys(keys: &&BTreeMap<String, String>) -> bool {
    keys.is_empty()
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeView {
            kind: self.kind(),
            name: self.name(),
            keys: self.keys(),
            content: self.content(),
            body: self.children().collect(),
        }
        .serialize(serializer)
    }
}

impl Serialize for Forest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for root in self.roots() {
            seq.serialize_element(&root)?;
        }
        seq.end()
    }
}
