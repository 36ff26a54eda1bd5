//! Node definition and tree surgery.
//!
//! Every [`Node`] is owned by an [`AstArena`](crate::AstArena). Structural
//! links are `Cell`s holding arena references, so re-linking never moves or
//! frees anything: detaching a node only rewrites the links around it.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::ptr;

use bumpalo::collections::String as BumpString;
use serde::Serialize;

use crate::{LinkData, NodeData, NodeKind, TreeError};

/// A node in the document tree.
///
/// A node knows its parent, its first and last child, and its previous and
/// next sibling. After every mutation primitive:
///
/// - `parent.first_child()` / `parent.last_child()` bound the sibling chain
/// - `n.next_sibling().previous_sibling() == n` for every adjacent pair
/// - a detached node has no parent and no siblings
///
/// Leaf kinds never get children from a well-behaved producer, but the
/// primitives themselves do not check the [containment
/// policy](crate::can_contain).
///
/// # Example
///
/// ```rust
/// use marktree_ast::{AstArena, NodeData, NodeKind};
///
/// let arena = AstArena::new();
/// let para = arena.alloc_node(NodeData::Paragraph);
/// let text = arena.alloc_node(NodeData::Text);
/// text.set_literal("hello");
/// para.append_child(text).unwrap();
///
/// assert_eq!(text.parent().map(|p| p.kind()), Some(NodeKind::Paragraph));
/// assert_eq!(para.children().count(), 1);
/// ```
pub struct Node<'a> {
    parent: Cell<Option<&'a Node<'a>>>,
    first_child: Cell<Option<&'a Node<'a>>>,
    last_child: Cell<Option<&'a Node<'a>>>,
    prev: Cell<Option<&'a Node<'a>>>,
    next: Cell<Option<&'a Node<'a>>>,

    data: RefCell<NodeData<'a>>,

    /// Finalized text of leaf nodes.
    literal: Cell<Option<&'a str>>,

    /// Raw markup accumulated while the block is open.
    content: RefCell<BumpString<'a>>,

    open: Cell<bool>,
}

impl<'a> Node<'a> {
    pub(crate) fn new(data: NodeData<'a>, content: BumpString<'a>) -> Self {
        Self {
            parent: Cell::new(None),
            first_child: Cell::new(None),
            last_child: Cell::new(None),
            prev: Cell::new(None),
            next: Cell::new(None),
            data: RefCell::new(data),
            literal: Cell::new(None),
            content: RefCell::new(content),
            open: Cell::new(true),
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<&'a Node<'a>> {
        self.parent.get()
    }

    #[inline]
    pub fn first_child(&self) -> Option<&'a Node<'a>> {
        self.first_child.get()
    }

    #[inline]
    pub fn last_child(&self) -> Option<&'a Node<'a>> {
        self.last_child.get()
    }

    #[inline]
    pub fn previous_sibling(&self) -> Option<&'a Node<'a>> {
        self.prev.get()
    }

    #[inline]
    pub fn next_sibling(&self) -> Option<&'a Node<'a>> {
        self.next.get()
    }

    /// Borrows the payload.
    ///
    /// # Panics
    ///
    /// Panics if the payload is currently borrowed mutably.
    #[inline]
    pub fn data(&self) -> Ref<'_, NodeData<'a>> {
        self.data.borrow()
    }

    /// Mutably borrows the payload, e.g. to settle list tightness once all
    /// items are known.
    ///
    /// # Panics
    ///
    /// Panics if the payload is currently borrowed.
    #[inline]
    pub fn data_mut(&self) -> RefMut<'_, NodeData<'a>> {
        self.data.borrow_mut()
    }

    /// Returns the kind tag of this node's payload.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.data.borrow().kind()
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Returns the finalized text value, if one has been set.
    #[inline]
    pub fn literal(&self) -> Option<&'a str> {
        self.literal.get()
    }

    #[inline]
    pub fn set_literal(&self, literal: &'a str) {
        self.literal.set(Some(literal));
    }

    /// Borrows the raw content accumulated so far.
    pub fn content(&self) -> Ref<'_, str> {
        Ref::map(self.content.borrow(), |s| s.as_str())
    }

    /// Appends raw markup to an open node.
    pub fn push_content(&self, text: &str) -> Result<(), TreeError> {
        if !self.is_open() {
            return Err(TreeError::NodeClosed { node: self.kind() });
        }
        self.content.borrow_mut().push_str(text);
        Ok(())
    }

    /// Discards the raw content buffer.
    pub fn clear_content(&self) {
        self.content.borrow_mut().clear();
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Marks the node as finished by its producer.
    #[inline]
    pub fn close(&self) {
        self.open.set(false);
    }

    /// Returns an iterator over the direct children of this node.
    ///
    /// The iterator follows `next_sibling` links lazily, so detaching the
    /// child it last returned ends the iteration early.
    pub fn children(&self) -> Children<'a> {
        Children {
            next: self.first_child.get(),
        }
    }

    /// Returns an iterator over the ancestors of this node, nearest first.
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors {
            next: self.parent.get(),
        }
    }

    /// Returns the topmost ancestor, or the node itself when detached.
    pub fn root(&'a self) -> &'a Node<'a> {
        self.ancestors().last().unwrap_or(self)
    }

    /// Returns true when `self` and `other` are the same node.
    #[inline]
    pub fn same_node(&self, other: &Node<'a>) -> bool {
        ptr::eq(self, other)
    }

    /// Returns true when `self` is `other` or one of its ancestors.
    fn is_self_or_ancestor_of(&self, other: &'a Node<'a>) -> bool {
        if other.same_node(self) {
            return true;
        }
        // A childless node is nobody's ancestor; this keeps top-down
        // building linear in depth.
        self.first_child.get().is_some() && other.ancestors().any(|a| a.same_node(self))
    }

    /// Follows a Link's footnote back-reference.
    ///
    /// Returns `None` when this is not a footnote link, or when the
    /// definition no longer lives in the same tree as the link (it was
    /// detached after the link was created). Callers treat `None` as "no
    /// footnote".
    pub fn live_footnote(&'a self) -> Option<&'a Node<'a>> {
        let target = match *self.data.borrow() {
            NodeData::Link(LinkData {
                note_id,
                footnote: Some(target),
                ..
            }) if note_id != 0 => target,
            _ => return None,
        };
        self.root().same_node(target.root()).then_some(target)
    }

    /// Removes this node from its current position.
    ///
    /// Neighbours and parent are re-linked around it and its own parent and
    /// sibling links are cleared. Children stay attached to the node, so a
    /// detached node carries its subtree with it. Calling this on an
    /// already detached node is a no-op.
    pub fn detach(&self) {
        let parent = self.parent.get();
        let prev = self.prev.get();
        let next = self.next.get();

        match prev {
            Some(prev) => prev.next.set(next),
            None => {
                if let Some(parent) = parent {
                    parent.first_child.set(next);
                }
            }
        }
        match next {
            Some(next) => next.prev.set(prev),
            None => {
                if let Some(parent) = parent {
                    parent.last_child.set(prev);
                }
            }
        }

        self.parent.set(None);
        self.prev.set(None);
        self.next.set(None);
    }

    /// Appends `child` as the last child of this node.
    ///
    /// `child` is detached first, so a node that already sits elsewhere is
    /// moved, never duplicated.
    ///
    /// # Errors
    ///
    /// [`TreeError::Cycle`] if `child` is this node or one of its ancestors.
    /// Nothing is modified in that case.
    pub fn append_child(&'a self, child: &'a Node<'a>) -> Result<(), TreeError> {
        if child.is_self_or_ancestor_of(self) {
            return Err(TreeError::Cycle { node: child.kind() });
        }

        child.detach();
        child.parent.set(Some(self));
        match self.last_child.get() {
            Some(last) => {
                last.next.set(Some(child));
                child.prev.set(Some(last));
            }
            None => self.first_child.set(Some(child)),
        }
        self.last_child.set(Some(child));
        Ok(())
    }

    /// Inserts `sibling` immediately before this node, under the same parent.
    ///
    /// # Errors
    ///
    /// - [`TreeError::DetachedAnchor`] if this node has no parent.
    /// - [`TreeError::Cycle`] if `sibling` is this node or one of its
    ///   ancestors.
    ///
    /// Nothing is modified on error.
    pub fn insert_before(&'a self, sibling: &'a Node<'a>) -> Result<(), TreeError> {
        let parent = self
            .parent
            .get()
            .ok_or(TreeError::DetachedAnchor { anchor: self.kind() })?;
        if sibling.is_self_or_ancestor_of(self) {
            return Err(TreeError::Cycle {
                node: sibling.kind(),
            });
        }

        sibling.detach();
        let prev = self.prev.get();
        sibling.prev.set(prev);
        match prev {
            Some(prev) => prev.next.set(Some(sibling)),
            None => parent.first_child.set(Some(sibling)),
        }
        sibling.next.set(Some(self));
        self.prev.set(Some(sibling));
        sibling.parent.set(Some(parent));
        Ok(())
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Links are left out: printing them would recurse through the tree.
        let mut s = f.debug_struct("Node");
        match self.data.try_borrow() {
            Ok(data) => s.field("kind", &data.kind()),
            Err(_) => s.field("kind", &"<borrowed>"),
        };
        s.field("literal", &self.literal.get())
            .field("open", &self.open.get())
            .finish_non_exhaustive()
    }
}

/// Iterator over the children of a node. See [`Node::children`].
#[derive(Debug, Clone)]
pub struct Children<'a> {
    next: Option<&'a Node<'a>>,
}

impl<'a> Iterator for Children<'a> {
    type Item = &'a Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next_sibling();
        Some(node)
    }
}

/// Iterator over the ancestors of a node. See [`Node::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a Node<'a>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.parent();
        Some(node)
    }
}

/// Deepest nesting, below the node being serialized, that [`Node`]'s
/// `Serialize` impl accepts. Serializers recurse once per level, so deeper
/// subtrees fail with a serializer error instead of exhausting the stack.
pub const MAX_SERIALIZE_DEPTH: usize = 256;

/// Serializes a subtree as nested objects.
///
/// The subtree's height is measured first, without recursion; subtrees
/// nested deeper than [`MAX_SERIALIZE_DEPTH`] are rejected.
impl Serialize for Node<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::Error;

        let height = subtree_height(self);
        if height > MAX_SERIALIZE_DEPTH {
            return Err(S::Error::custom(format!(
                "tree is nested {} levels deep, more than the {} that can be serialized",
                height, MAX_SERIALIZE_DEPTH
            )));
        }
        Subtree(self).serialize(serializer)
    }
}

/// Number of levels below `node`: 0 for a childless node.
fn subtree_height(node: &Node<'_>) -> usize {
    let Some(mut current) = node.first_child() else {
        return 0;
    };
    let (mut depth, mut height) = (1, 1);
    loop {
        height = height.max(depth);
        if let Some(child) = current.first_child() {
            current = child;
            depth += 1;
            continue;
        }
        loop {
            if let Some(next) = current.next_sibling() {
                current = next;
                break;
            }
            match current.parent() {
                Some(parent) if depth > 1 => {
                    current = parent;
                    depth -= 1;
                }
                _ => return height,
            }
        }
    }
}

struct Subtree<'n, 'a>(&'n Node<'a>);

impl Serialize for Subtree<'_, '_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let node = self.0;
        let data = node.data.borrow();
        let kind = data.kind();

        let mut len = 1 + data.present_field_count();
        if node.literal.get().is_some() {
            len += 1;
        }
        if kind.is_container() {
            len += 1;
        }

        let mut state = serializer.serialize_struct("Node", len)?;
        state.serialize_field("type", &kind)?;
        data.serialize_fields(&mut state)?;
        if let Some(literal) = node.literal.get() {
            state.serialize_field("literal", literal)?;
        }
        if kind.is_container() {
            state.serialize_field("children", &SerializeChildren(node))?;
        }
        state.end()
    }
}

struct SerializeChildren<'n, 'a>(&'n Node<'a>);

impl Serialize for SerializeChildren<'_, '_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.0.children().count()))?;
        for child in self.0.children() {
            seq.serialize_element(&Subtree(child))?;
        }
        seq.end()
    }
}
