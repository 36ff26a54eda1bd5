//! Two-phase traversal of marktree nodes.
//!
//! # Overview
//!
//! - [`walk`] - Walk a subtree with a closure
//! - [`walk_with`] - Walk a subtree with a [`Visitor`]
//! - [`Walker`] - Pull-style iterator over `(node, entering)` events
//! - [`WalkStatus`] - What the visitor wants the walker to do next
//!
//! Containers produce an entering and an exiting event around their
//! subtree, leaves produce exactly one entering event. Traversal is
//! iterative, so arbitrarily deep documents are safe to walk.
//!
//! # Examples
//!
//! ## Collecting Text Content
//!
//! ```rust
//! use marktree_ast::{AstArena, NodeData, NodeKind};
//! use marktree_ast::visitor::{WalkStatus, walk};
//!
//! let arena = AstArena::new();
//! let doc = arena.alloc_node(NodeData::Document);
//! let para = arena.alloc_node(NodeData::Paragraph);
//! let text = arena.alloc_node(NodeData::Text);
//! text.set_literal("hello");
//! doc.append_child(para).unwrap();
//! para.append_child(text).unwrap();
//!
//! let mut texts = Vec::new();
//! walk(doc, |node, _entering| {
//!     if node.kind() == NodeKind::Text {
//!         texts.extend(node.literal());
//!     }
//!     WalkStatus::GoToNext
//! });
//! assert_eq!(texts, vec!["hello"]);
//! ```
//!
//! ## Early Termination
//!
//! ```rust
//! use marktree_ast::{AstArena, NodeData, NodeKind};
//! use marktree_ast::visitor::{WalkStatus, walk};
//!
//! let arena = AstArena::new();
//! let doc = arena.alloc_node(NodeData::Document);
//! doc.append_child(arena.alloc_node(NodeData::heading(2))).unwrap();
//! doc.append_child(arena.alloc_node(NodeData::heading(3))).unwrap();
//!
//! let mut first_level = None;
//! walk(doc, |node, entering| {
//!     if let (true, NodeData::Heading(heading)) = (entering, *node.data()) {
//!         first_level = Some(heading.level);
//!         return WalkStatus::Terminate;
//!     }
//!     WalkStatus::GoToNext
//! });
//! assert_eq!(first_level, Some(2));
//! ```

mod visit;
mod walk;

pub use visit::{Visitor, WalkStatus};
pub use walk::{Walker, walk, walk_with};
