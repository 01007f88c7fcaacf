//! Ancestor value lookups: `elem` (a context's name) or `elem.key` (one of its keys).
//!
//! Lookups never fail. Any absence resolves to one of the sentinel strings
//! below so templating callers can print it as an opaque placeholder.

use std::fmt;

use super::Spec;
use crate::node::NodeRef;

/// No ancestor matches the element part.
pub const NO_CONTEXT: &str = "noCTX";
/// The ancestor has no such key.
pub const NO_KEY: &str = "noKey";
/// The key exists but its value is empty.
pub const NO_VALUE: &str = "noVal";
/// A name was requested but the ancestor is unnamed.
pub const NO_NAME: &str = "noName";

/// `elem` or `elem.key`, where `elem` is itself a [`Spec`] (`div`, `div:main`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    pub elem: Spec,
    /// `None` requests the element's name.
    pub key: Option<String>,
}

impl ValueSpec {
    /// Split at the first `.`; everything after it is the key.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once('.') {
            Some((elem, key)) => Self {
                elem: Spec::parse(elem),
                key: Some(key.to_string()),
            },
            None => Self {
                elem: Spec::parse(spec),
                key: None,
            },
        }
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// The requested value read from `node` itself, if it matches the element part.
    ///
    /// A present key counts even when empty; a name only counts when set.
    pub fn value<'a>(&self, node: NodeRef<'a>) -> Option<&'a str> {
        if !self.elem.matches(node) {
            return None;
        }
        match &self.key {
            Some(key) => node.get(key),
            None => Some(node.name()).filter(|name| !name.is_empty()),
        }
    }

    /// Resolve against the nearest matching strict ancestor of `node`.
    pub fn lookup(&self, node: NodeRef<'_>) -> String {
        let Some(ctx) = node.context(&self.elem) else {
            return NO_CONTEXT.to_string();
        };
        let value = match &self.key {
            Some(key) => match ctx.get(key) {
                None => NO_KEY,
                Some("") => NO_VALUE,
                Some(value) => value,
            },
            None => match ctx.name() {
                "" => NO_NAME,
                name => name,
            },
        };
        value.to_string()
    }
}

impl fmt::Display for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}.{}", self.elem, key),
            None => write!(f, "{}", self.elem),
        }
    }
}

impl<'a> NodeRef<'a> {
    /// Look up `elem` or `elem.key` in the surrounding context.
    pub fn lookup(&self, spec: &str) -> String {
        ValueSpec::parse(spec).lookup(*self)
    }

    /// [`lookup`](Self::lookup) for each spec, in order.
    pub fn slice(&self, specs: &[&str]) -> Vec<String> {
        specs.iter().map(|spec| self.lookup(spec)).collect()
    }

    pub fn join(&self, sep: &str, specs: &[&str]) -> String {
        self.slice(specs).join(sep)
    }

    /// Gather values walking from this node up to its root.
    ///
    /// At each level the remaining specs are tried in order; the first that
    /// resolves is emitted and the list is narrowed to start at that spec, so
    /// later levels can only produce it or the specs after it.
    pub fn collect(&self, specs: &[&str]) -> Vec<String> {
        let specs: Vec<ValueSpec> = specs.iter().map(|s| ValueSpec::parse(s)).collect();
        let mut remaining = specs.as_slice();
        let mut found = Vec::new();

        for node in std::iter::once(*self).chain(self.ancestors()) {
            let hit = remaining
                .iter()
                .enumerate()
                .find_map(|(i, spec)| spec.value(node).map(|value| (i, value)));
            if let Some((i, value)) = hit {
                found.push(value.to_string());
                remaining = &remaining[i..];
            }
        }
        found
    }
}
