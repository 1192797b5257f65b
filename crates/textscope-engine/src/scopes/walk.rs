use std::collections::VecDeque;

use crate::scopes::tree::{NodeId, ScopeTree};

/// Visitor verdict for a single visited node. The default is
/// [`Continue`](Flow::Continue); the other variants prune or end the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Keep walking.
    #[default]
    Continue,
    /// Do not descend into this node's children.
    SkipChildren,
    /// Do not visit this node's remaining same-level siblings. Its own
    /// children are still visited.
    SkipSiblings,
    /// End the walk immediately.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    DepthFirst,
    BreadthFirst,
}

/// Traversal configuration for [`ScopeTree::walk`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    pub strategy: Strategy,
    /// Visit each node's children last-to-first.
    pub reverse: bool,
    /// Auto-abort once this many nodes have been collected.
    pub limit: Option<usize>,
}

/// Per-walk state handed to the visitor. Collection is explicit: only nodes
/// the visitor passes to [`collect`](Walker::collect) end up in the walk's
/// result, and each call appends, so collecting a node twice reports it
/// twice.
pub struct Walker {
    current: NodeId,
    collected: Vec<NodeId>,
    limit: Option<usize>,
    aborted: bool,
}

impl Walker {
    fn new(start: NodeId, limit: Option<usize>) -> Self {
        Self {
            current: start,
            collected: Vec::new(),
            limit,
            aborted: false,
        }
    }

    /// The node currently being visited.
    pub fn node(&self) -> NodeId {
        self.current
    }

    /// Appends a node to the walk's result. Reaching the configured limit
    /// aborts the walk; a collect attempted past the limit is dropped.
    pub fn collect(&mut self, id: NodeId) {
        if let Some(limit) = self.limit {
            if self.collected.len() >= limit {
                self.aborted = true;
                return;
            }
            self.collected.push(id);
            if self.collected.len() >= limit {
                self.aborted = true;
            }
        } else {
            self.collected.push(id);
        }
    }
}

impl ScopeTree {
    /// Visits the subtree under `start` (inclusive), calling `visitor` on
    /// each node and honoring its [`Flow`] verdicts. Returns the nodes the
    /// visitor collected, in collection order.
    ///
    /// Both strategies are iterative. Depth-first keeps one pending-sibling
    /// frame per level so `SkipSiblings` can drop the remainder of exactly
    /// the current frame; breadth-first prunes the already-enqueued portion
    /// of the current generation instead.
    pub fn walk<F>(&self, start: NodeId, options: WalkOptions, mut visitor: F) -> Vec<NodeId>
    where
        F: FnMut(&ScopeTree, NodeId, &mut Walker) -> Flow,
    {
        let mut walker = Walker::new(start, options.limit);
        match options.strategy {
            Strategy::DepthFirst => self.walk_depth_first(&mut walker, options, &mut visitor),
            Strategy::BreadthFirst => self.walk_breadth_first(&mut walker, options, &mut visitor),
        }
        walker.collected
    }

    fn ordered_children(&self, id: NodeId, reverse: bool) -> VecDeque<NodeId> {
        let children = self.children(id);
        if reverse {
            children.iter().rev().copied().collect()
        } else {
            children.iter().copied().collect()
        }
    }

    fn walk_depth_first<F>(&self, walker: &mut Walker, options: WalkOptions, visitor: &mut F)
    where
        F: FnMut(&ScopeTree, NodeId, &mut Walker) -> Flow,
    {
        let start = walker.current;
        let flow = visitor(self, start, walker);
        if walker.aborted || flow == Flow::Abort {
            return;
        }
        let mut stack: Vec<VecDeque<NodeId>> = Vec::new();
        if flow != Flow::SkipChildren {
            let frame = self.ordered_children(start, options.reverse);
            if !frame.is_empty() {
                stack.push(frame);
            }
        }
        while let Some(frame) = stack.last_mut() {
            let Some(current) = frame.pop_front() else {
                stack.pop();
                continue;
            };
            walker.current = current;
            let flow = visitor(self, current, walker);
            if walker.aborted || flow == Flow::Abort {
                return;
            }
            if flow == Flow::SkipSiblings {
                frame.clear();
            }
            if flow != Flow::SkipChildren {
                let next = self.ordered_children(current, options.reverse);
                if !next.is_empty() {
                    stack.push(next);
                }
            }
        }
    }

    fn walk_breadth_first<F>(&self, walker: &mut Walker, options: WalkOptions, visitor: &mut F)
    where
        F: FnMut(&ScopeTree, NodeId, &mut Walker) -> Flow,
    {
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        queue.push_back(walker.current);
        while let Some(current) = queue.pop_front() {
            walker.current = current;
            let flow = visitor(self, current, walker);
            if walker.aborted || flow == Flow::Abort {
                return;
            }
            if flow == Flow::SkipSiblings && let Some(reference) = self.parent(current) {
                // The queue holds the rest of this generation followed by the
                // next one. Siblings share the reference parent; enqueued
                // children of earlier siblings have it as grandparent.
                while let Some(&front) = queue.front() {
                    let parent = self.parent(front);
                    let grandparent = parent.and_then(|p| self.parent(p));
                    if parent == Some(reference) || grandparent == Some(reference) {
                        queue.pop_front();
                    } else {
                        break;
                    }
                }
            }
            if flow != Flow::SkipChildren {
                queue.extend(self.ordered_children(current, options.reverse));
            }
        }
    }
}
