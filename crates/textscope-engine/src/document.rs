//! Document wrapper: a scope tree with the conventional source-language
//! root shape and line-level derived operations.

use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

use regex::Regex;

use crate::scopes::{NodeId, ScopeError, ScopeTree, Span};

fn newline_regex() -> &'static Regex {
    static NEWLINE: OnceLock<Regex> = OnceLock::new();
    NEWLINE.get_or_init(|| Regex::new(r"\r?\n").expect("valid newline regex"))
}

/// A [`ScopeTree`] whose root is tagged `source.<language>` and carries one
/// untagged child spanning the whole buffer, so annotation passes always
/// have a sliceable top level to work against. Empty documents keep a
/// terminal root instead, since a zero-width child can never be operated on.
///
/// Derefs to the underlying tree, so all structural operations apply
/// directly to a document.
pub struct Document {
    tree: ScopeTree,
    language: String,
}

impl Document {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        let language = language.into();
        let mut tree = ScopeTree::new(format!("source.{language}"), text);
        if !tree.source().is_empty() {
            tree.spawn_child(tree.root());
        }
        Self { tree, language }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Splits the document at every line terminator (`\n` or `\r\n`), tags
    /// each terminator node `newline`, and returns the root's children
    /// grouped into lines. The terminator nodes themselves separate the
    /// groups and appear in none of them; a terminator directly following
    /// another yields an empty line. Text after the final terminator forms a
    /// last line only if it is non-empty.
    ///
    /// Splitting runs at the root, so tag lineage crossed by a terminator is
    /// preserved on both sides of the cut.
    pub fn break_lines(&mut self) -> Result<Vec<Vec<NodeId>>, ScopeError> {
        let terminators: Vec<Span> = newline_regex()
            .find_iter(self.tree.source())
            .map(|found| Span::new(found.start(), found.end()))
            .collect();
        for span in terminators {
            let root = self.tree.root();
            let parts = self.tree.split(root, span)?;
            self.tree.set_kind(parts.inner, "newline");
        }

        let mut lines = Vec::new();
        let mut current = Vec::new();
        for &child in self.tree.children(self.tree.root()) {
            if self.tree.kind(child) == "newline" {
                lines.push(std::mem::take(&mut current));
            } else {
                current.push(child);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        Ok(lines)
    }
}

impl Deref for Document {
    type Target = ScopeTree;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}

impl DerefMut for Document {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tree
    }
}
