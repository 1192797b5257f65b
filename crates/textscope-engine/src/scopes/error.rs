/// Errors raised by structural operations on a scope tree.
///
/// All failures are synchronous and fail-fast: the tree performs no retries
/// and no silent recovery. Whether a failed annotation step is fatal or
/// merely skipped is the caller's policy, not the tree's.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// The requested range runs backwards (`start > end`).
    #[error("invalid range [{start}, {end}): start exceeds end")]
    InvalidRange { start: usize, end: usize },

    /// The requested range is not contained in the operated-on node's span.
    #[error("range [{start}, {end}) is outside the node's span [{node_start}, {node_end})")]
    OutOfBounds {
        start: usize,
        end: usize,
        node_start: usize,
        node_end: usize,
    },

    /// A zero-width slice was requested without adjacent mode, or the point
    /// sits exactly on a node's own edge, which would require persisting a
    /// zero-width node.
    #[error("zero-width slice at offset {at} is prohibited")]
    ZeroWidthProhibited { at: usize },

    /// `branch` was called on a node that already has children.
    #[error("node of kind {kind:?} is already branched")]
    AlreadyBranched { kind: String },

    /// The child binary search stopped making progress: the children no
    /// longer tile their parent. This is a fatal assertion on a corrupted
    /// tree, never an expected outcome.
    #[error("scope tree is inconsistent: no child owns range [{start}, {end})")]
    StructuralInconsistency { start: usize, end: usize },

    /// An operation that needs a parent (sibling index, splicing) was invoked
    /// on a parentless node.
    #[error("{operation} requires a parent node and cannot be applied to the root")]
    RootOperation { operation: &'static str },
}
