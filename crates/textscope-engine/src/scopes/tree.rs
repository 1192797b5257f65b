use serde::Serialize;

use crate::scopes::error::ScopeError;
use crate::scopes::span::Span;

/// Stable handle to a node in a [`ScopeTree`] arena.
///
/// Handles never dangle: the arena is append-only, so a `NodeId` obtained
/// from any operation stays valid for the life of the tree. A node spliced
/// out by a structural operation keeps its arena slot but becomes
/// unreachable from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena-allocated node. Parent and sibling links are lookup-only back
/// references; ownership flows strictly from parent to `children`.
#[derive(Debug, Clone)]
struct Node {
    kind: String,
    span: Span,
    parent: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Result of [`ScopeTree::slice_adjacent`]: whichever of the three parts the
/// slice actually produced. `target` is absent only for zero-width slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceParts {
    pub head: Option<NodeId>,
    pub target: Option<NodeId>,
    pub tail: Option<NodeId>,
}

/// Result of [`ScopeTree::slice_and_branch_adjacent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchedParts {
    pub head: Option<NodeId>,
    pub target: NodeId,
    /// The untagged child installed under `target`.
    pub inner: NodeId,
    pub tail: Option<NodeId>,
}

/// Result of [`ScopeTree::split`]: the node covering exactly the requested
/// range, plus the ordered untouched-or-reconstructed siblings on either
/// side at the called node's own depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitParts {
    pub head: Vec<NodeId>,
    pub inner: NodeId,
    pub tail: Vec<NodeId>,
}

/// Snapshot form of a subtree, bit-exact with the persisted representation:
/// a leaf is the 2-tuple `(kind, text)`, an internal node is
/// `(kind, [children...])`. The untagged serde representation renders these
/// as plain JSON arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Serialized {
    Leaf(String, String),
    Branch(String, Vec<Serialized>),
}

/// A tree of labeled, non-overlapping scopes over an immutable text buffer.
///
/// The tree upholds a strict tiling invariant: whenever a node has children,
/// their spans exactly and contiguously cover the node's own span. All
/// structural operations ([`slice`](Self::slice), [`branch`](Self::branch),
/// [`split`](Self::split)) preserve that invariant while splicing in place,
/// so a consumer can carve ranges in any order without ever managing sibling
/// bookkeeping itself.
pub struct ScopeTree {
    text: String,
    nodes: Vec<Node>,
}

impl ScopeTree {
    /// Creates a tree with a single terminal root of the given kind spanning
    /// the whole buffer.
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let root = Node {
            kind: kind.into(),
            span: Span::new(0, text.len()),
            parent: None,
            prev: None,
            next: None,
            children: Vec::new(),
        };
        Self {
            text,
            nodes: vec![root],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The full backing buffer.
    pub fn source(&self) -> &str {
        &self.text
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    fn alloc(&mut self, kind: String, span: Span, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            parent,
            prev: None,
            next: None,
            children: Vec::new(),
        });
        id
    }

    // ---- accessors ---------------------------------------------------------

    pub fn kind(&self, id: NodeId) -> &str {
        &self.node(id).kind
    }

    pub fn set_kind(&mut self, id: NodeId, kind: impl Into<String>) {
        self.node_mut(id).kind = kind.into();
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// The node's text: the buffer slice for its span.
    pub fn text(&self, id: NodeId) -> &str {
        let span = self.node(id).span;
        &self.text[span.start..span.end]
    }

    pub fn len(&self, id: NodeId) -> usize {
        self.node(id).span.len()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next
    }

    /// A node is terminal iff it has no children.
    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.node(id).children.is_empty()
    }

    /// Distance to the parentless root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Position within the parent's children.
    pub fn index(&self, id: NodeId) -> Result<usize, ScopeError> {
        let parent = self
            .node(id)
            .parent
            .ok_or(ScopeError::RootOperation { operation: "index" })?;
        self.node(parent)
            .children
            .iter()
            .position(|&child| child == id)
            .ok_or(ScopeError::StructuralInconsistency {
                start: self.node(id).span.start,
                end: self.node(id).span.end,
            })
    }

    pub fn leftmost_descendant(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&first) = self.node(current).children.first() {
            current = first;
        }
        current
    }

    pub fn rightmost_descendant(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&last) = self.node(current).children.last() {
            current = last;
        }
        current
    }

    // ---- locate ------------------------------------------------------------

    /// Finds the deepest node containing `range`, revalidating containment at
    /// every level on the way down.
    pub fn locate(&self, id: NodeId, range: Span) -> Result<NodeId, ScopeError> {
        let mut current = id;
        loop {
            self.check_range(current, range)?;
            if self.node(current).children.is_empty() {
                return Ok(current);
            }
            current = self.child_containing(current, range)?;
        }
    }

    /// Like [`locate`](Self::locate) but descends one level only.
    pub fn locate_child(&self, id: NodeId, range: Span) -> Result<NodeId, ScopeError> {
        self.check_range(id, range)?;
        if self.node(id).children.is_empty() {
            return Ok(id);
        }
        self.child_containing(id, range)
    }

    fn check_range(&self, id: NodeId, range: Span) -> Result<(), ScopeError> {
        if range.start > range.end {
            return Err(ScopeError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        let span = self.node(id).span;
        if range.start < span.start || range.end > span.end {
            return Err(ScopeError::OutOfBounds {
                start: range.start,
                end: range.end,
                node_start: span.start,
                node_end: span.end,
            });
        }
        Ok(())
    }

    /// Binary search for the child whose span contains `range.start`.
    /// Children are sorted and contiguous by the tiling invariant, so a
    /// midpoint that repeats means the invariant is broken.
    fn child_containing(&self, id: NodeId, range: Span) -> Result<NodeId, ScopeError> {
        let children = &self.node(id).children;
        let inconsistent = ScopeError::StructuralInconsistency {
            start: range.start,
            end: range.end,
        };
        let mut low = 0usize;
        let mut high = children.len() - 1;
        let mut last_mid = usize::MAX;
        loop {
            let mid = low.midpoint(high);
            if mid == last_mid {
                return Err(inconsistent);
            }
            last_mid = mid;
            let span = self.node(children[mid]).span;
            if span.start > range.start {
                if mid == 0 {
                    return Err(inconsistent);
                }
                high = mid - 1;
            } else if span.end <= range.start {
                low = mid + 1;
            } else {
                return Ok(children[mid]);
            }
        }
    }

    // ---- slice -------------------------------------------------------------

    /// Ensures a node exists whose bounds are exactly `range` and returns it.
    /// Zero-width ranges are rejected; use
    /// [`slice_adjacent`](Self::slice_adjacent) for those.
    pub fn slice(&mut self, id: NodeId, range: Span) -> Result<NodeId, ScopeError> {
        self.check_range(id, range)?;
        if range.is_empty() {
            return Err(ScopeError::ZeroWidthProhibited { at: range.start });
        }
        let owner = self.locate(id, range)?;
        let parts = self.slice_at(owner, range)?;
        // Non-empty ranges always produce a target.
        parts
            .target
            .ok_or(ScopeError::StructuralInconsistency {
                start: range.start,
                end: range.end,
            })
    }

    /// Like [`slice`](Self::slice) but also reports the head/tail fragments
    /// the cut produced, and permits zero-width points: a point strictly
    /// inside a node splits it into `{head, tail}` with no target. Points on
    /// a node's own edge are always rejected, since materializing them would
    /// persist a zero-width node.
    pub fn slice_adjacent(&mut self, id: NodeId, range: Span) -> Result<SliceParts, ScopeError> {
        self.check_range(id, range)?;
        if range.is_empty() {
            self.check_zero_width_edges(id, range)?;
        }
        let owner = self.locate(id, range)?;
        if range.is_empty() {
            self.check_zero_width_edges(owner, range)?;
        }
        self.slice_at(owner, range)
    }

    fn check_zero_width_edges(&self, id: NodeId, range: Span) -> Result<(), ScopeError> {
        let span = self.node(id).span;
        if range.start == span.start || range.end == span.end {
            return Err(ScopeError::ZeroWidthProhibited { at: range.start });
        }
        Ok(())
    }

    /// Performs the actual surgery on the node owning `range`. The owner is
    /// always the deepest containing node, so it is terminal (or the range is
    /// an exact match). Exactly one splice happens per call, keeping the
    /// tiling invariant intact at every return.
    fn slice_at(&mut self, owner: NodeId, range: Span) -> Result<SliceParts, ScopeError> {
        let span = self.node(owner).span;
        if span == range {
            return Ok(SliceParts {
                head: None,
                target: Some(owner),
                tail: None,
            });
        }
        let parent = self.node(owner).parent.ok_or(ScopeError::RootOperation {
            operation: "slicing a partial range",
        })?;
        let index = self.index(owner)?;

        if range.is_empty() {
            // Interior point: the owner is replaced by two same-kind halves
            // meeting exactly at the point.
            let head = self.clone_node(owner, Span::new(span.start, range.start));
            let tail = self.clone_node(owner, Span::new(range.end, span.end));
            let before = self.node(owner).prev;
            let after = self.node(owner).next;
            self.link(before, Some(head));
            self.link(Some(head), Some(tail));
            self.link(Some(tail), after);
            self.node_mut(parent)
                .children
                .splice(index..=index, [head, tail]);
            self.detach(owner);
            return Ok(SliceParts {
                head: Some(head),
                target: None,
                tail: Some(tail),
            });
        }

        if span.start == range.start {
            // Left-aligned: shrink in place, peel a tail.
            let tail = self.clone_node(owner, Span::new(range.end, span.end));
            self.node_mut(owner).span.end = range.end;
            let after = self.node(owner).next;
            self.link(Some(owner), Some(tail));
            self.link(Some(tail), after);
            self.node_mut(parent).children.insert(index + 1, tail);
            Ok(SliceParts {
                head: None,
                target: Some(owner),
                tail: Some(tail),
            })
        } else if span.end == range.end {
            // Right-aligned: shrink in place, peel a head.
            let head = self.clone_node(owner, Span::new(span.start, range.start));
            self.node_mut(owner).span.start = range.start;
            let before = self.node(owner).prev;
            self.link(before, Some(head));
            self.link(Some(head), Some(owner));
            self.node_mut(parent).children.insert(index, head);
            Ok(SliceParts {
                head: Some(head),
                target: Some(owner),
                tail: None,
            })
        } else {
            // Interior: shrink to the range and peel both sides.
            let head = self.clone_node(owner, Span::new(span.start, range.start));
            let tail = self.clone_node(owner, Span::new(range.end, span.end));
            self.node_mut(owner).span = range;
            let before = self.node(owner).prev;
            let after = self.node(owner).next;
            self.link(before, Some(head));
            self.link(Some(head), Some(owner));
            self.link(Some(owner), Some(tail));
            self.link(Some(tail), after);
            self.node_mut(parent)
                .children
                .splice(index..=index, [head, owner, tail]);
            Ok(SliceParts {
                head: Some(head),
                target: Some(owner),
                tail: Some(tail),
            })
        }
    }

    /// Fresh node with the template's kind and parent, covering `span`.
    fn clone_node(&mut self, template: NodeId, span: Span) -> NodeId {
        let kind = self.node(template).kind.clone();
        let parent = self.node(template).parent;
        self.alloc(kind, span, parent)
    }

    /// Points two neighbors at each other. `None` on either side clears the
    /// matching link of the other.
    fn link(&mut self, left: Option<NodeId>, right: Option<NodeId>) {
        if let Some(left) = left {
            self.node_mut(left).next = right;
        }
        if let Some(right) = right {
            self.node_mut(right).prev = left;
        }
    }

    fn detach(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.parent = None;
        node.prev = None;
        node.next = None;
    }

    // ---- branch ------------------------------------------------------------

    /// Installs a single untagged child spanning the node's own interval,
    /// so the node can be subdivided further while keeping its own kind.
    pub fn branch(&mut self, id: NodeId) -> Result<NodeId, ScopeError> {
        if !self.node(id).children.is_empty() {
            return Err(ScopeError::AlreadyBranched {
                kind: self.node(id).kind.clone(),
            });
        }
        Ok(self.spawn_child(id))
    }

    pub(crate) fn spawn_child(&mut self, id: NodeId) -> NodeId {
        let span = self.node(id).span;
        let child = self.alloc(String::new(), span, Some(id));
        self.node_mut(id).children.push(child);
        child
    }

    /// [`slice`](Self::slice) then [`branch`](Self::branch) the target.
    pub fn slice_and_branch(&mut self, id: NodeId, range: Span) -> Result<NodeId, ScopeError> {
        let parts = self.slice_adjacent(id, range)?;
        let target = parts
            .target
            .ok_or(ScopeError::ZeroWidthProhibited { at: range.start })?;
        self.branch(target)?;
        Ok(target)
    }

    /// Like [`slice_and_branch`](Self::slice_and_branch) but reports the full
    /// set of produced parts, including the new inner child.
    pub fn slice_and_branch_adjacent(
        &mut self,
        id: NodeId,
        range: Span,
    ) -> Result<BranchedParts, ScopeError> {
        let parts = self.slice_adjacent(id, range)?;
        let target = parts
            .target
            .ok_or(ScopeError::ZeroWidthProhibited { at: range.start })?;
        let inner = self.branch(target)?;
        Ok(BranchedParts {
            head: parts.head,
            target,
            inner,
            tail: parts.tail,
        })
    }

    // ---- split -------------------------------------------------------------

    /// Cuts a cross-section through the subtree: produces a single node
    /// exactly covering `range` — reconstructed across ancestor levels where
    /// the cut descends — plus the ordered siblings before and after it at
    /// the called node's depth. Each ancestor level crossed by the cut yields
    /// one same-kind wrapper per non-empty side, so no tag lineage is lost on
    /// either face.
    ///
    /// Invoked on the parentless root (the canonical entry, used by
    /// [`Document::break_lines`](crate::Document::break_lines)), the root's
    /// children are wholesale reassigned to `[..head, inner, ..tail]` from
    /// the recursive result and every sibling link is rebuilt. Lower
    /// invocations return the parts and leave reassembly to the enclosing
    /// recursion.
    pub fn split(&mut self, id: NodeId, range: Span) -> Result<SplitParts, ScopeError> {
        let mut head = Vec::new();
        let mut cursor = self.node(id).prev;
        while let Some(prev) = cursor {
            head.push(prev);
            cursor = self.node(prev).prev;
        }
        head.reverse();
        let mut tail = Vec::new();
        let mut cursor = self.node(id).next;
        while let Some(next) = cursor {
            tail.push(next);
            cursor = self.node(next).next;
        }

        let terminal = self.node(id).children.is_empty();
        let inner = match (self.node(id).parent, terminal) {
            (None, true) => {
                if self.node(id).span == range {
                    id
                } else {
                    return Err(ScopeError::RootOperation {
                        operation: "splitting a partial range",
                    });
                }
            }
            (None, false) => {
                let child = self.locate_child(id, range)?;
                let parts = self.split(child, range)?;
                let mut rebuilt = parts.head;
                rebuilt.push(parts.inner);
                rebuilt.extend(parts.tail);
                self.adopt(id, rebuilt);
                parts.inner
            }
            (Some(_), true) => {
                if self.node(id).span == range {
                    id
                } else {
                    let parts = self.slice_adjacent(id, range)?;
                    let target = parts
                        .target
                        .ok_or(ScopeError::ZeroWidthProhibited { at: range.start })?;
                    if let Some(fragment) = parts.head {
                        self.node_mut(fragment).next = None;
                        head.push(fragment);
                    }
                    if let Some(fragment) = parts.tail {
                        self.node_mut(fragment).prev = None;
                        tail.insert(0, fragment);
                    }
                    target
                }
            }
            (Some(_), false) => {
                let child = self.locate_child(id, range)?;
                let parts = self.split(child, range)?;
                if !parts.head.is_empty() {
                    let wrapper = self.wrap(id, parts.head);
                    head.push(wrapper);
                }
                if !parts.tail.is_empty() {
                    let wrapper = self.wrap(id, parts.tail);
                    tail.insert(0, wrapper);
                }
                parts.inner
            }
        };

        Ok(SplitParts { head, inner, tail })
    }

    /// Reassigns `children` under `parent` and rebuilds the sibling chain.
    fn adopt(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for (position, &child) in children.iter().enumerate() {
            let node = self.node_mut(child);
            node.parent = Some(parent);
            node.prev = if position > 0 {
                Some(children[position - 1])
            } else {
                None
            };
            node.next = children.get(position + 1).copied();
        }
        self.node_mut(parent).children = children;
    }

    /// Synthesizes a same-kind clone of `template` wrapping `fragments`, with
    /// bounds recomputed from the first fragment's start to the last's end.
    fn wrap(&mut self, template: NodeId, fragments: Vec<NodeId>) -> NodeId {
        let span = Span::new(
            self.node(fragments[0]).span.start,
            self.node(fragments[fragments.len() - 1]).span.end,
        );
        let kind = self.node(template).kind.clone();
        let parent = self.node(template).parent;
        let wrapper = self.alloc(kind, span, parent);
        self.adopt(wrapper, fragments);
        wrapper
    }

    // ---- serialize ---------------------------------------------------------

    /// Snapshot form of the subtree rooted at `id`.
    pub fn serialize(&self, id: NodeId) -> Serialized {
        let node = self.node(id);
        if node.children.is_empty() {
            Serialized::Leaf(node.kind.clone(), self.text(id).to_string())
        } else {
            Serialized::Branch(
                node.kind.clone(),
                node.children
                    .iter()
                    .map(|&child| self.serialize(child))
                    .collect(),
            )
        }
    }
}
