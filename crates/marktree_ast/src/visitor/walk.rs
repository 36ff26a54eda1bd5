//! The iterative tree walker.
//!
//! The walker keeps only `{current, entering}`. Parent and sibling links
//! already encode the way back up, so no stack is needed and nesting depth
//! is bounded by memory, not by the call stack.

use crate::Node;

use super::visit::{Visitor, WalkStatus};

/// Depth-first walker over a subtree.
///
/// Used directly it is an iterator of `(node, entering)` events. Call
/// [`Walker::skip_children`] right after receiving an entering event to
/// avoid descending into that node.
///
/// Structural edits made during a walk are observed as the walker reaches
/// them; detaching the current node's ancestors ends the walk early.
#[derive(Debug, Clone)]
pub struct Walker<'a> {
    root: &'a Node<'a>,
    current: Option<&'a Node<'a>>,
    entering: bool,
    started: bool,
}

impl<'a> Walker<'a> {
    /// Creates a walker positioned on `root`, entering.
    pub fn new(root: &'a Node<'a>) -> Self {
        Self {
            root,
            current: Some(root),
            entering: true,
            started: false,
        }
    }

    /// Suppresses descent into the node of the last entering event.
    ///
    /// That node's exiting event is still produced if it is a container.
    pub fn skip_children(&mut self) {
        self.entering = false;
    }

    /// Moves to the next event.
    fn advance(&mut self) {
        let Some(current) = self.current else {
            return;
        };

        if current.same_node(self.root) && (!self.entering || !current.is_container()) {
            self.current = None;
            return;
        }

        if self.entering && current.is_container() {
            match current.first_child() {
                Some(child) => {
                    self.current = Some(child);
                    self.entering = true;
                }
                None => self.entering = false,
            }
        } else if let Some(next) = current.next_sibling() {
            self.current = Some(next);
            self.entering = true;
        } else {
            self.current = current.parent();
            self.entering = false;
        }
    }
}

impl<'a> Iterator for Walker<'a> {
    type Item = (&'a Node<'a>, bool);

    fn next(&mut self) -> Option<Self::Item> {
        if self.started {
            self.advance();
        } else {
            self.started = true;
        }
        self.current.map(|node| (node, self.entering))
    }
}

/// Walks the subtree rooted at `root`, calling `visitor(node, entering)`.
///
/// Containers are reported twice (entering, then exiting after their
/// subtree); leaves are reported once with `entering == true`. The walk
/// stops when the subtree is exhausted or the visitor returns
/// [`WalkStatus::Terminate`].
///
/// # Example
///
/// ```rust
/// use marktree_ast::{AstArena, NodeData, walk};
/// use marktree_ast::visitor::WalkStatus;
///
/// let arena = AstArena::new();
/// let doc = arena.alloc_node(NodeData::Document);
/// let para = arena.alloc_node(NodeData::Paragraph);
/// doc.append_child(para).unwrap();
///
/// let mut events = Vec::new();
/// walk(doc, |node, entering| {
///     events.push((node.kind().to_string(), entering));
///     WalkStatus::GoToNext
/// });
///
/// assert_eq!(events.len(), 4);
/// ```
pub fn walk<'a, F>(root: &'a Node<'a>, mut visitor: F)
where
    F: FnMut(&'a Node<'a>, bool) -> WalkStatus,
{
    walk_with(root, &mut visitor);
}

/// Walks the subtree rooted at `root` with a [`Visitor`].
pub fn walk_with<'a, V>(root: &'a Node<'a>, visitor: &mut V)
where
    V: Visitor<'a> + ?Sized,
{
    let mut walker = Walker::new(root);
    while let Some(node) = walker.current {
        match visitor.visit(node, walker.entering) {
            WalkStatus::GoToNext => walker.advance(),
            WalkStatus::SkipChildren => {
                walker.skip_children();
                walker.advance();
            }
            WalkStatus::Terminate => return,
        }
    }
}

impl<'a> Node<'a> {
    /// Walks the subtree rooted at this node. See [`walk`].
    pub fn walk<F>(&'a self, visitor: F)
    where
        F: FnMut(&'a Node<'a>, bool) -> WalkStatus,
    {
        walk(self, visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AstArena, NodeData, NodeKind};
    use pretty_assertions::assert_eq;

    type Event = (String, bool);

    fn label(node: &Node<'_>) -> String {
        match node.literal() {
            Some(text) => format!("{}:{}", node.kind(), text),
            None => node.kind().to_string(),
        }
    }

    fn record<'a>(root: &'a Node<'a>) -> Vec<Event> {
        let mut events = Vec::new();
        walk(root, |node, entering| {
            events.push((label(node), entering));
            WalkStatus::GoToNext
        });
        events
    }

    fn ev(name: &str, entering: bool) -> Event {
        (name.to_string(), entering)
    }

    fn text<'a>(arena: &'a AstArena, value: &'a str) -> &'a Node<'a> {
        let node = arena.alloc_node(NodeData::Text);
        node.set_literal(value);
        node
    }

    /// Document
    ///   Paragraph [Text "a", Emph [Text "b"], Text "c"]
    ///   HorizontalRule
    ///   BlockQuote [Paragraph [Text "d"]]
    fn sample<'a>(arena: &'a AstArena) -> &'a Node<'a> {
        let doc = arena.alloc_node(NodeData::Document);
        let p1 = arena.alloc_node(NodeData::Paragraph);
        let emph = arena.alloc_node(NodeData::Emph);
        let quote = arena.alloc_node(NodeData::BlockQuote);
        let p2 = arena.alloc_node(NodeData::Paragraph);

        doc.append_child(p1).unwrap();
        p1.append_child(text(arena, "a")).unwrap();
        p1.append_child(emph).unwrap();
        emph.append_child(text(arena, "b")).unwrap();
        p1.append_child(text(arena, "c")).unwrap();
        doc.append_child(arena.alloc_node(NodeData::HorizontalRule))
            .unwrap();
        doc.append_child(quote).unwrap();
        quote.append_child(p2).unwrap();
        p2.append_child(text(arena, "d")).unwrap();
        doc
    }

    #[test]
    fn test_document_paragraph_text() {
        let arena = AstArena::new();
        let doc = arena.alloc_node(NodeData::Document);
        let para = arena.alloc_node(NodeData::Paragraph);
        doc.append_child(para).unwrap();
        para.append_child(text(&arena, "hi")).unwrap();

        assert_eq!(
            record(doc),
            vec![
                ev("Document", true),
                ev("Paragraph", true),
                ev("Text:hi", true),
                ev("Paragraph", false),
                ev("Document", false),
            ]
        );
    }

    #[test]
    fn test_full_traversal_order() {
        let arena = AstArena::new();
        let doc = sample(&arena);

        assert_eq!(
            record(doc),
            vec![
                ev("Document", true),
                ev("Paragraph", true),
                ev("Text:a", true),
                ev("Emph", true),
                ev("Text:b", true),
                ev("Emph", false),
                ev("Text:c", true),
                ev("Paragraph", false),
                ev("HorizontalRule", true),
                ev("BlockQuote", true),
                ev("Paragraph", true),
                ev("Text:d", true),
                ev("Paragraph", false),
                ev("BlockQuote", false),
                ev("Document", false),
            ]
        );
    }

    #[test]
    fn test_empty_container_enters_then_exits() {
        let arena = AstArena::new();
        let doc = arena.alloc_node(NodeData::Document);
        doc.append_child(arena.alloc_node(NodeData::BlockQuote))
            .unwrap();
        doc.append_child(text(&arena, "after")).unwrap();

        assert_eq!(
            record(doc),
            vec![
                ev("Document", true),
                ev("BlockQuote", true),
                ev("BlockQuote", false),
                ev("Text:after", true),
                ev("Document", false),
            ]
        );
    }

    #[test]
    fn test_empty_root_container() {
        let arena = AstArena::new();
        let doc = arena.alloc_node(NodeData::Document);

        assert_eq!(record(doc), vec![ev("Document", true), ev("Document", false)]);
    }

    #[test]
    fn test_leaf_root_is_visited_once() {
        let arena = AstArena::new();
        let leaf = text(&arena, "solo");

        assert_eq!(record(leaf), vec![ev("Text:solo", true)]);
    }

    #[test]
    fn test_walk_stays_inside_subtree() {
        let arena = AstArena::new();
        let doc = sample(&arena);
        let quote = doc.last_child().unwrap();
        assert_eq!(quote.kind(), NodeKind::BlockQuote);

        // Walk a subtree whose root has a previous sibling and a parent.
        let first = doc.first_child().unwrap();
        assert_eq!(
            record(first.next_sibling().unwrap()),
            vec![ev("HorizontalRule", true)]
        );
        assert_eq!(
            record(first),
            vec![
                ev("Paragraph", true),
                ev("Text:a", true),
                ev("Emph", true),
                ev("Text:b", true),
                ev("Emph", false),
                ev("Text:c", true),
                ev("Paragraph", false),
            ]
        );
    }

    #[test]
    fn test_event_parity() {
        let arena = AstArena::new();
        let doc = sample(&arena);

        let (mut enters, mut exits, mut leaves) = (0, 0, 0);
        walk(doc, |node, entering| {
            match (node.is_container(), entering) {
                (true, true) => enters += 1,
                (true, false) => exits += 1,
                (false, true) => leaves += 1,
                (false, false) => panic!("leaf {} got an exit event", node.kind()),
            }
            WalkStatus::GoToNext
        });

        assert_eq!(enters, 5);
        assert_eq!(exits, 5);
        assert_eq!(leaves, 5);
    }

    #[test]
    fn test_skip_children_still_exits() {
        let arena = AstArena::new();
        let doc = sample(&arena);

        let mut events = Vec::new();
        walk(doc, |node, entering| {
            events.push((label(node), entering));
            if entering && node.kind() == NodeKind::Paragraph {
                WalkStatus::SkipChildren
            } else {
                WalkStatus::GoToNext
            }
        });

        assert_eq!(
            events,
            vec![
                ev("Document", true),
                ev("Paragraph", true),
                ev("Paragraph", false),
                ev("HorizontalRule", true),
                ev("BlockQuote", true),
                ev("Paragraph", true),
                ev("Paragraph", false),
                ev("BlockQuote", false),
                ev("Document", false),
            ]
        );
    }

    #[test]
    fn test_skip_children_on_leaf_moves_on() {
        let arena = AstArena::new();
        let doc = sample(&arena);

        let mut events = Vec::new();
        walk(doc, |node, entering| {
            events.push((label(node), entering));
            if node.kind() == NodeKind::Text {
                WalkStatus::SkipChildren
            } else {
                WalkStatus::GoToNext
            }
        });

        assert_eq!(events, record(doc));
    }

    #[test]
    fn test_skip_children_on_exit_is_plain_advance() {
        let arena = AstArena::new();
        let doc = sample(&arena);

        let mut events = Vec::new();
        walk(doc, |node, entering| {
            events.push((label(node), entering));
            if entering {
                WalkStatus::GoToNext
            } else {
                WalkStatus::SkipChildren
            }
        });

        assert_eq!(events, record(doc));
    }

    #[test]
    fn test_skip_children_on_root() {
        let arena = AstArena::new();
        let doc = sample(&arena);

        let mut events = Vec::new();
        walk(doc, |node, entering| {
            events.push((label(node), entering));
            WalkStatus::SkipChildren
        });

        assert_eq!(events, vec![ev("Document", true), ev("Document", false)]);
    }

    #[test]
    fn test_terminate_while_entering() {
        let arena = AstArena::new();
        let doc = sample(&arena);

        let mut events = Vec::new();
        walk(doc, |node, entering| {
            events.push((label(node), entering));
            if node.kind() == NodeKind::Emph {
                WalkStatus::Terminate
            } else {
                WalkStatus::GoToNext
            }
        });

        assert_eq!(
            events,
            vec![
                ev("Document", true),
                ev("Paragraph", true),
                ev("Text:a", true),
                ev("Emph", true),
            ]
        );
    }

    #[test]
    fn test_terminate_while_exiting() {
        let arena = AstArena::new();
        let doc = sample(&arena);

        let mut events = Vec::new();
        walk(doc, |node, entering| {
            events.push((label(node), entering));
            if !entering && node.kind() == NodeKind::Paragraph {
                WalkStatus::Terminate
            } else {
                WalkStatus::GoToNext
            }
        });

        assert_eq!(events.last(), Some(&ev("Paragraph", false)));
        assert_eq!(events.len(), 8);
    }

    #[test]
    fn test_terminate_on_first_event() {
        let arena = AstArena::new();
        let doc = sample(&arena);

        let mut calls = 0;
        walk(doc, |_, _| {
            calls += 1;
            WalkStatus::Terminate
        });

        assert_eq!(calls, 1);
    }

    #[test]
    fn test_walker_iterator_matches_walk() {
        let arena = AstArena::new();
        let doc = sample(&arena);

        let events: Vec<Event> = Walker::new(doc)
            .map(|(node, entering)| (label(node), entering))
            .collect();

        assert_eq!(events, record(doc));
    }

    #[test]
    fn test_walker_iterator_skip_children() {
        let arena = AstArena::new();
        let doc = sample(&arena);

        let mut walker = Walker::new(doc);
        let mut events = Vec::new();
        while let Some((node, entering)) = walker.next() {
            events.push((label(node), entering));
            if entering && node.kind() == NodeKind::BlockQuote {
                walker.skip_children();
            }
        }

        assert_eq!(
            &events[events.len() - 3..],
            &[
                ev("BlockQuote", true),
                ev("BlockQuote", false),
                ev("Document", false),
            ]
        );
    }

    #[test]
    fn test_node_walk_and_struct_visitor() {
        struct Collector {
            texts: Vec<String>,
        }

        impl<'a> Visitor<'a> for Collector {
            fn visit(&mut self, node: &'a Node<'a>, _entering: bool) -> WalkStatus {
                if let Some(text) = node.literal() {
                    self.texts.push(text.to_string());
                }
                WalkStatus::GoToNext
            }
        }

        let arena = AstArena::new();
        let doc = sample(&arena);

        let mut collector = Collector { texts: Vec::new() };
        walk_with(doc, &mut collector);
        assert_eq!(collector.texts, vec!["a", "b", "c", "d"]);

        let mut count = 0;
        doc.walk(|_, _| {
            count += 1;
            WalkStatus::GoToNext
        });
        assert_eq!(count, 15);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        const DEPTH: usize = 50_000;

        let arena = AstArena::new();
        let doc = arena.alloc_node(NodeData::Document);
        let mut parent = doc;
        for _ in 0..DEPTH {
            let quote = arena.alloc_node(NodeData::BlockQuote);
            parent.append_child(quote).unwrap();
            parent = quote;
        }
        parent.append_child(text(&arena, "bottom")).unwrap();

        let (mut events, mut max_depth, mut depth) = (0usize, 0usize, 0usize);
        walk(doc, |node, entering| {
            events += 1;
            if node.is_container() {
                if entering {
                    depth += 1;
                    max_depth = max_depth.max(depth);
                } else {
                    depth -= 1;
                }
            }
            WalkStatus::GoToNext
        });

        assert_eq!(events, 2 * (DEPTH + 1) + 1);
        assert_eq!(max_depth, DEPTH + 1);
        assert_eq!(depth, 0);
    }
}
