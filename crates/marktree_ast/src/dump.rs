//! Human-readable tree dumps for debugging.

use std::fmt::Write;

use crate::{Node, WalkStatus, walk};

/// Renders the subtree rooted at `root`, one node per line.
///
/// Each line is `Kind("text")` indented by two spaces per level, where the
/// text is the node's literal, or its raw content when no literal is set.
///
/// ```rust
/// use marktree_ast::{AstArena, NodeData, dump};
///
/// let arena = AstArena::new();
/// let para = arena.alloc_node(NodeData::Paragraph);
/// let text = arena.alloc_node(NodeData::Text);
/// text.set_literal("hi");
/// para.append_child(text).unwrap();
///
/// assert_eq!(dump(para), "Paragraph(\"\")\n  Text(\"hi\")\n");
/// ```
pub fn dump<'a>(root: &'a Node<'a>) -> String {
    let mut out = String::new();
    let mut depth = 0usize;

    walk(root, |node, entering| {
        if !entering {
            depth -= 1;
            return WalkStatus::GoToNext;
        }

        let indent = "  ".repeat(depth);
        let _ = match node.literal() {
            Some(literal) => writeln!(out, "{}{}({:?})", indent, node.kind(), literal),
            None => writeln!(out, "{}{}({:?})", indent, node.kind(), &*node.content()),
        };
        if node.is_container() {
            depth += 1;
        }
        WalkStatus::GoToNext
    });

    out
}
