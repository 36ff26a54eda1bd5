//! Tree error types.

use thiserror::Error;

use crate::NodeKind;

/// Errors reported by tree surgery and validation.
///
/// Every variant is a caller contract violation. Mutation primitives check
/// their preconditions before touching any link, so an `Err` always leaves
/// the tree exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// `insert_before` was called on a node that has no parent.
    #[error("cannot insert before a {anchor} node that has no parent")]
    DetachedAnchor {
        /// Kind of the rootless anchor.
        anchor: NodeKind,
    },

    /// The operation would make a node its own ancestor.
    #[error("cannot move a {node} node underneath itself")]
    Cycle {
        /// Kind of the node being moved.
        node: NodeKind,
    },

    /// Raw content was pushed into a node that is already closed.
    #[error("cannot add content to closed {node} node")]
    NodeClosed {
        /// Kind of the closed node.
        node: NodeKind,
    },

    /// A parent/child/sibling link disagrees with its counterpart.
    #[error("broken {link} link at {node} node")]
    BrokenLink {
        /// Kind of the node where the inconsistency was found.
        node: NodeKind,
        /// Which link is inconsistent.
        link: &'static str,
    },

    /// A leaf kind has children.
    #[error("{node} node cannot have children")]
    LeafWithChildren {
        /// Kind of the leaf.
        node: NodeKind,
    },

    /// A child kind is not allowed under its parent kind.
    #[error("{parent} node cannot contain {child} node")]
    Containment {
        /// Kind of the parent.
        parent: NodeKind,
        /// Kind of the rejected child.
        child: NodeKind,
    },

    /// A Link's serial number and footnote target disagree: a non-zero
    /// `note_id` needs a target, and a target needs a non-zero `note_id`.
    #[error("footnote link with note id {note_id} {problem}")]
    FootnoteLink {
        /// The Link's serial number.
        note_id: usize,
        /// Which half is missing.
        problem: &'static str,
    },
}
