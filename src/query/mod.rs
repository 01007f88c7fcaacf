//! Type/name matchers for searching a decoded tree.
//!
//! A [`Spec`] is written `type`, `type:` or `type:name`:
//!
//! - `div` leaves the name unconstrained,
//! - `div:` requires the name to be empty,
//! - `div:main` requires the name `main`.
//!
//! Path descent comes in two flavours. [`NodeRef::child`] and
//! [`NodeRef::find_node`] are loose: a bare `div` step matches any div.
//! [`NodeRef::get_node`] is exact: a bare `div` step only matches an
//! unnamed div.

pub mod value;

pub use value::{ValueSpec, NO_CONTEXT, NO_KEY, NO_NAME, NO_VALUE};

use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::node::NodeRef;

/// Matcher for a node's type and, optionally, its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spec {
    pub kind: String,
    /// `None`: any name. `Some("")`: name must be empty.
    pub name: Option<String>,
}

impl Spec {
    /// Spec matching any node of this type.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
        }
    }

    pub fn named(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: Some(name.into()),
        }
    }

    /// Parse `type`, `type:` or `type:name`. Everything after the first
    /// colon is the name.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once(':') {
            Some((kind, name)) => Self::named(kind, name),
            None => Self::new(spec),
        }
    }

    /// Loose match: type equal, and name equal when constrained.
    pub fn matches(&self, node: NodeRef<'_>) -> bool {
        if self.kind != node.kind() {
            return false;
        }
        match &self.name {
            None => true,
            Some(name) => name == node.name(),
        }
    }

    /// Exact match: an unconstrained name is treated as the empty name.
    pub fn matches_exact(&self, node: NodeRef<'_>) -> bool {
        self.kind == node.kind() && self.name.as_deref().unwrap_or("") == node.name()
    }

    /// Shallowest matching descendant of `node`, level by level.
    pub fn find<'a>(&self, node: NodeRef<'a>) -> Option<NodeRef<'a>> {
        Descendants::new(node).find(|n| self.matches(*n))
    }

    /// Every matching descendant, in level order.
    pub fn find_all<'a>(&self, node: NodeRef<'a>) -> Vec<NodeRef<'a>> {
        Descendants::new(node).filter(|n| self.matches(*n)).collect()
    }
}

impl FromStr for Spec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Spec::parse(s))
    }
}

impl From<&str> for Spec {
    fn from(s: &str) -> Self {
        Spec::parse(s)
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}:{}", self.kind, name),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Level-order walk over the strict descendants of a node.
struct Descendants<'a> {
    queue: VecDeque<NodeRef<'a>>,
}

impl<'a> Descendants<'a> {
    fn new(node: NodeRef<'a>) -> Self {
        Self {
            queue: node.children().collect(),
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.queue.pop_front()?;
        self.queue.extend(next.children());
        Some(next)
    }
}

fn descend<'a>(
    start: NodeRef<'a>,
    path: &[Spec],
    matches: impl Fn(&Spec, NodeRef<'a>) -> bool,
) -> Option<NodeRef<'a>> {
    path.iter().try_fold(start, |at, spec| {
        at.children().find(|next| matches(spec, *next))
    })
}

impl<'a> NodeRef<'a> {
    /// Shallowest descendant matching `spec` (`type` or `type:name`).
    pub fn find(&self, spec: &str) -> Option<NodeRef<'a>> {
        Spec::parse(spec).find(*self)
    }

    pub fn find_all(&self, spec: &str) -> Vec<NodeRef<'a>> {
        Spec::parse(spec).find_all(*self)
    }

    /// Follow a path of direct children; a bare type matches any name.
    pub fn child(&self, path: &[&str]) -> Option<NodeRef<'a>> {
        let specs: Vec<Spec> = path.iter().map(|s| Spec::parse(s)).collect();
        self.find_node(&specs)
    }

    /// Loose path descent: first match in body order at each step.
    pub fn find_node(&self, path: &[Spec]) -> Option<NodeRef<'a>> {
        descend(*self, path, |spec, node| spec.matches(node))
    }

    /// Exact path descent: a step without a name only matches unnamed nodes.
    pub fn get_node(&self, path: &[&str]) -> Option<NodeRef<'a>> {
        let specs: Vec<Spec> = path.iter().map(|s| Spec::parse(s)).collect();
        descend(*self, &specs, |spec, node| spec.matches_exact(node))
    }

    /// Nearest strict ancestor matching `spec`.
    pub fn context(&self, spec: &Spec) -> Option<NodeRef<'a>> {
        self.ancestors().find(|node| spec.matches(*node))
    }
}
