//! Structural self-checks used by tests and property runs.
//!
//! Every check is an assertion: a failure means a structural operation has
//! corrupted the tree, which is a bug in this crate and never a recoverable
//! condition for callers.

use crate::scopes::tree::ScopeTree;

/// Walks every reachable node and asserts the full set of structural
/// invariants: span containment, contiguous tiling of each parent by its
/// children, mirrored parent and sibling links, and char-boundary spans.
pub fn check(tree: &ScopeTree) {
    let root = tree.root();
    assert_eq!(tree.parent(root), None, "root must be parentless");
    assert_eq!(tree.span(root).start, 0, "root must start at offset 0");
    assert_eq!(
        tree.span(root).end,
        tree.source().len(),
        "root must cover the whole buffer"
    );

    let mut pending = vec![root];
    while let Some(id) = pending.pop() {
        let span = tree.span(id);
        assert!(
            span.start <= span.end,
            "node span {span} must not run backwards"
        );
        assert!(
            tree.source().is_char_boundary(span.start)
                && tree.source().is_char_boundary(span.end),
            "node span {span} must sit on char boundaries"
        );
        if id != root {
            assert!(!span.is_empty(), "non-root node at {span} must be non-empty");
        }

        let children = tree.children(id);
        if children.is_empty() {
            continue;
        }

        let mut cursor = span.start;
        for (position, &child) in children.iter().enumerate() {
            let child_span = tree.span(child);
            assert_eq!(
                child_span.start, cursor,
                "children must tile their parent without gaps or overlap"
            );
            cursor = child_span.end;

            assert_eq!(
                tree.parent(child),
                Some(id),
                "child must point back at its parent"
            );
            let expected_prev = position.checked_sub(1).map(|i| children[i]);
            let expected_next = children.get(position + 1).copied();
            assert_eq!(
                tree.prev_sibling(child),
                expected_prev,
                "prev link must mirror the child list"
            );
            assert_eq!(
                tree.next_sibling(child),
                expected_next,
                "next link must mirror the child list"
            );

            pending.push(child);
        }
        assert_eq!(
            cursor, span.end,
            "children must end exactly at their parent's end"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scopes::span::Span;

    #[test]
    fn fresh_and_carved_trees_pass() {
        let mut tree = ScopeTree::new("source.test", "hello world");
        check(&tree);
        tree.spawn_child(tree.root());
        check(&tree);
        tree.slice(tree.root(), Span::new(0, 5)).unwrap();
        tree.slice_and_branch(tree.root(), Span::new(6, 11)).unwrap();
        tree.split(tree.root(), Span::new(5, 6)).unwrap();
        check(&tree);
    }

    #[test]
    fn empty_document_root_is_allowed() {
        let tree = ScopeTree::new("source.test", "");
        check(&tree);
    }
}
