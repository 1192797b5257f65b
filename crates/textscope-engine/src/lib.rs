//! Range-tree engine for annotating immutable text with nested, labeled
//! scopes.
//!
//! The core type is [`ScopeTree`]: a tree of half-open byte spans over a
//! fixed buffer, where each node's children exactly tile the node's span.
//! Trees are built by carving ranges out of existing nodes
//! ([`slice`](ScopeTree::slice)), subdividing a node while keeping its tag
//! ([`branch`](ScopeTree::branch)), or cutting a cross-section through every
//! level at once ([`split`](ScopeTree::split)). Reads go through
//! [`walk`](ScopeTree::walk) and the declarative [`search`](ScopeTree::search)
//! layer; [`Document`] adds the conventional `source.<language>` root shape
//! and line breaking on top.
//!
//! Node text is never stored: a node's text is the buffer slice for its
//! span, so annotation can never drift out of sync with the source.

pub mod document;
pub mod scopes;

pub use document::Document;
pub use scopes::{
    BranchedParts, Flow, NodeId, Pattern, Query, ScopeError, ScopeTree, Serialized, SliceParts,
    Span, SplitParts, Strategy, WalkOptions, Walker,
};
