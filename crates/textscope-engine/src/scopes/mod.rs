//! Scope trees: labeled, non-overlapping ranges over an immutable buffer.
//!
//! A [`ScopeTree`] starts as a single span covering the whole text and is
//! progressively carved by [`slice`](ScopeTree::slice),
//! [`branch`](ScopeTree::branch) and [`split`](ScopeTree::split) into a
//! hierarchy of tagged regions. The children of any node always tile the
//! node's span exactly, so the tree is simultaneously a flat segmentation at
//! every depth. Traversal ([`walk`](ScopeTree::walk)) and matching
//! ([`search`](ScopeTree::search)) never mutate; annotation passes collect
//! first and retag afterwards.

pub mod error;
pub mod invariants;
pub mod search;
pub mod span;
pub mod tree;
pub mod walk;

pub use error::ScopeError;
pub use search::{Pattern, Query};
pub use span::Span;
pub use tree::{BranchedParts, NodeId, ScopeTree, Serialized, SliceParts, SplitParts};
pub use walk::{Flow, Strategy, WalkOptions, Walker};
