//! Well-formedness checks for a constructed tree.
//!
//! Mutation primitives keep links consistent but never look at node kinds.
//! [`validate`] checks both: linkage and the containment policy.

use crate::{LinkData, Node, NodeData, TreeError, Walker, can_contain};

/// Checks the subtree rooted at `root`.
///
/// Reports the first problem found, in walk order:
///
/// - [`TreeError::BrokenLink`] when a parent, sibling or first/last child
///   link disagrees with its counterpart
/// - [`TreeError::LeafWithChildren`] when a leaf kind has children
/// - [`TreeError::Containment`] when a child is not allowed by
///   [`can_contain`] under a parent whose kind the policy governs
/// - [`TreeError::FootnoteLink`] when a Link has a footnote target without
///   a serial number, or a serial number without a target
///
/// Runs without recursion.
pub fn validate<'a>(root: &'a Node<'a>) -> Result<(), TreeError> {
    for (node, entering) in Walker::new(root) {
        if entering {
            check_node(node)?;
        }
    }
    Ok(())
}

fn check_node<'a>(node: &'a Node<'a>) -> Result<(), TreeError> {
    check_footnote_link(node)?;

    let kind = node.kind();
    let broken = |link| TreeError::BrokenLink { node: kind, link };

    let (first, last) = match (node.first_child(), node.last_child()) {
        (None, None) => return Ok(()),
        (Some(first), Some(last)) => (first, last),
        (None, Some(_)) => return Err(broken("first_child")),
        (Some(_), None) => return Err(broken("last_child")),
    };

    if !kind.is_container() {
        return Err(TreeError::LeafWithChildren { node: kind });
    }
    if first.previous_sibling().is_some() {
        return Err(broken("first_child"));
    }

    let mut previous: Option<&'a Node<'a>> = None;
    for child in node.children() {
        let child_kind = child.kind();
        if !child.parent().is_some_and(|p| p.same_node(node)) {
            return Err(TreeError::BrokenLink {
                node: child_kind,
                link: "parent",
            });
        }
        let prev_matches = match (child.previous_sibling(), previous) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same_node(b),
            _ => false,
        };
        if !prev_matches {
            return Err(TreeError::BrokenLink {
                node: child_kind,
                link: "prev",
            });
        }
        if kind.has_containment_rules() && !can_contain(kind, child_kind) {
            return Err(TreeError::Containment {
                parent: kind,
                child: child_kind,
            });
        }
        previous = Some(child);
    }

    match previous {
        Some(tail) if tail.same_node(last) => Ok(()),
        _ => Err(broken("last_child")),
    }
}

fn check_footnote_link(node: &Node<'_>) -> Result<(), TreeError> {
    let NodeData::Link(LinkData {
        note_id, footnote, ..
    }) = *node.data()
    else {
        return Ok(());
    };
    let problem = match (note_id, footnote) {
        (0, Some(_)) => "has a target",
        (_, None) if note_id != 0 => "has no target",
        _ => return Ok(()),
    };
    Err(TreeError::FootnoteLink { note_id, problem })
}
