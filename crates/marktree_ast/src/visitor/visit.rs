//! Visitor trait for walking marktree nodes.
//!
//! A visitor receives one call per event: containers produce an entering
//! and an exiting event, leaves produce a single entering event. The
//! returned [`WalkStatus`] steers the walker.
//!
//! # Example
//!
//! ```rust
//! use marktree_ast::{AstArena, Node, NodeData, NodeKind};
//! use marktree_ast::visitor::{Visitor, WalkStatus, walk_with};
//!
//! /// Counts headings, without looking inside them.
//! struct HeadingCounter {
//!     count: usize,
//! }
//!
//! impl<'a> Visitor<'a> for HeadingCounter {
//!     fn visit(&mut self, node: &'a Node<'a>, entering: bool) -> WalkStatus {
//!         if entering && node.kind() == NodeKind::Heading {
//!             self.count += 1;
//!             return WalkStatus::SkipChildren;
//!         }
//!         WalkStatus::GoToNext
//!     }
//! }
//!
//! let arena = AstArena::new();
//! let doc = arena.alloc_node(NodeData::Document);
//! doc.append_child(arena.alloc_node(NodeData::heading(1))).unwrap();
//! doc.append_child(arena.alloc_node(NodeData::Paragraph)).unwrap();
//!
//! let mut counter = HeadingCounter { count: 0 };
//! walk_with(doc, &mut counter);
//! assert_eq!(counter.count, 1);
//! ```

use crate::Node;

/// What the walker should do after a visitor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkStatus {
    /// Continue with the default traversal order.
    GoToNext,
    /// Do not descend into the current node. Its exiting event is still
    /// delivered when it is a container.
    SkipChildren,
    /// Stop the walk. No further events are delivered, including exiting
    /// events for containers still open on the path.
    Terminate,
}

/// Receives walker events.
///
/// Any `FnMut(&'a Node<'a>, bool) -> WalkStatus` closure is a visitor.
pub trait Visitor<'a> {
    /// Called for every event. `entering` is true on the way down (and for
    /// the single event of a leaf), false on the way back up.
    fn visit(&mut self, node: &'a Node<'a>, entering: bool) -> WalkStatus;
}

impl<'a, F> Visitor<'a> for F
where
    F: FnMut(&'a Node<'a>, bool) -> WalkStatus,
{
    #[inline]
    fn visit(&mut self, node: &'a Node<'a>, entering: bool) -> WalkStatus {
        self(node, entering)
    }
}
