//! # marktree_ast
//!
//! Document tree for marktree.
//!
//! This crate provides the in-memory model of a parsed markup document:
//! typed nodes linked into a mutable tree, the policy saying which kinds
//! may contain which, and the iterative walker every renderer, linter and
//! transformer uses to visit the tree.
//!
//! ## Architecture
//!
//! - Uses `bumpalo` for arena allocation; all nodes of a document live in
//!   one [`AstArena`] and are freed together
//! - Structural links (parent, children, siblings) are non-owning arena
//!   references, so detach/append/insert only re-link
//! - The payload is the closed [`NodeData`] enum; dispatch is by `match`
//! - [`walk`] is a `{current, entering}` state machine with no recursion
//!
//! ## Example
//!
//! ```rust
//! use marktree_ast::{AstArena, NodeData, NodeKind, WalkStatus, can_contain, walk};
//!
//! let arena = AstArena::new();
//! let doc = arena.alloc_node(NodeData::Document);
//! let para = arena.alloc_node(NodeData::Paragraph);
//! assert!(can_contain(doc.kind(), para.kind()));
//! doc.append_child(para).unwrap();
//!
//! let mut kinds = Vec::new();
//! walk(doc, |node, entering| {
//!     kinds.push((node.kind(), entering));
//!     WalkStatus::GoToNext
//! });
//! assert_eq!(kinds[1], (NodeKind::Paragraph, true));
//! ```

mod arena;
mod containment;
mod dump;
mod error;
mod node;
mod node_data;
mod node_kind;
mod validate;
pub mod visitor;

pub use arena::AstArena;
pub use containment::can_contain;
pub use dump::dump;
pub use error::TreeError;
pub use node::{Ancestors, Children, MAX_SERIALIZE_DEPTH, Node};
pub use node_data::{
    CellAlign, CodeBlockData, HeadingData, ImageData, LinkData, ListData, ListFlags, NodeData,
    TableCellData,
};
pub use node_kind::NodeKind;
pub use validate::validate;

// Re-export commonly used visitor items for convenience
pub use visitor::{Visitor, WalkStatus, Walker, walk, walk_with};
