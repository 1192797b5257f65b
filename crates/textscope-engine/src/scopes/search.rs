use regex::Regex;

use crate::scopes::tree::{NodeId, ScopeTree};
use crate::scopes::walk::{Flow, WalkOptions};

/// One matchable condition on a node attribute.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// The attribute equals this string exactly.
    Exact(String),
    /// The attribute equals any of these strings.
    AnyOf(Vec<String>),
    /// The attribute matches this regex.
    Matches(Regex),
}

impl Pattern {
    fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Exact(expected) => value == expected,
            Pattern::AnyOf(expected) => expected.iter().any(|candidate| candidate == value),
            Pattern::Matches(regex) => regex.is_match(value),
        }
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Pattern::Exact(value.to_string())
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Pattern::Exact(value)
    }
}

impl From<Vec<&str>> for Pattern {
    fn from(values: Vec<&str>) -> Self {
        Pattern::AnyOf(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Pattern {
    fn from(values: Vec<String>) -> Self {
        Pattern::AnyOf(values)
    }
}

impl From<Regex> for Pattern {
    fn from(value: Regex) -> Self {
        Pattern::Matches(value)
    }
}

/// Declarative node filter for [`ScopeTree::search`]. All set conditions
/// must hold for a node to match; unset conditions always hold.
#[derive(Debug, Clone, Default)]
pub struct Query {
    kind: Option<Pattern>,
    text: Option<Pattern>,
    not_kind: Option<Pattern>,
    not_text: Option<Pattern>,
    parent: Option<Box<Query>>,
    ancestor: Option<Box<Query>>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, pattern: impl Into<Pattern>) -> Self {
        self.kind = Some(pattern.into());
        self
    }

    pub fn text(mut self, pattern: impl Into<Pattern>) -> Self {
        self.text = Some(pattern.into());
        self
    }

    pub fn not_kind(mut self, pattern: impl Into<Pattern>) -> Self {
        self.not_kind = Some(pattern.into());
        self
    }

    pub fn not_text(mut self, pattern: impl Into<Pattern>) -> Self {
        self.not_text = Some(pattern.into());
        self
    }

    /// Requires the node's immediate parent to match the given query. A
    /// parentless node never satisfies this condition.
    pub fn parent(mut self, query: Query) -> Self {
        self.parent = Some(Box::new(query));
        self
    }

    /// Requires some strict ancestor, at any distance, to match the given
    /// query.
    pub fn ancestor(mut self, query: Query) -> Self {
        self.ancestor = Some(Box::new(query));
        self
    }

    fn matches(&self, tree: &ScopeTree, id: NodeId) -> bool {
        if let Some(pattern) = &self.kind
            && !pattern.matches(tree.kind(id))
        {
            return false;
        }
        if let Some(pattern) = &self.text
            && !pattern.matches(tree.text(id))
        {
            return false;
        }
        if let Some(pattern) = &self.not_kind
            && pattern.matches(tree.kind(id))
        {
            return false;
        }
        if let Some(pattern) = &self.not_text
            && pattern.matches(tree.text(id))
        {
            return false;
        }
        if let Some(query) = &self.parent {
            match tree.parent(id) {
                Some(parent) => {
                    if !query.matches(tree, parent) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        if let Some(query) = &self.ancestor {
            let mut cursor = tree.parent(id);
            let mut found = false;
            while let Some(ancestor) = cursor {
                if query.matches(tree, ancestor) {
                    found = true;
                    break;
                }
                cursor = tree.parent(ancestor);
            }
            if !found {
                return false;
            }
        }
        true
    }
}

impl ScopeTree {
    /// Depth-first scan of the subtree under `start` (inclusive), returning
    /// every node the query matches, in visit order.
    pub fn search(&self, start: NodeId, query: &Query) -> Vec<NodeId> {
        self.walk(start, WalkOptions::default(), |tree, id, walker| {
            if query.matches(tree, id) {
                walker.collect(id);
            }
            Flow::Continue
        })
    }
}
