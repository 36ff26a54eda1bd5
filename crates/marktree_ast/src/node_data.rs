//! Node payloads.
//!
//! [`NodeData`] is a closed tagged union: the variant is the node's kind and
//! each variant owns the fields only that kind needs.

use std::ops::{BitOr, BitOrAssign};

use serde::Serialize;

use crate::{Node, NodeKind};

/// Payload of a node. The variant doubles as the node's kind.
#[derive(Debug, Clone, Copy)]
pub enum NodeData<'a> {
    Document,
    BlockQuote,
    List(ListData<'a>),
    Item(ListData<'a>),
    Paragraph,
    Heading(HeadingData<'a>),
    HorizontalRule,
    Emph,
    Strong,
    Del,
    Link(LinkData<'a>),
    Image(ImageData<'a>),
    Text,
    HtmlBlock,
    CodeBlock(CodeBlockData<'a>),
    Softbreak,
    Hardbreak,
    Code,
    HtmlSpan,
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableCell(TableCellData),
}

/// Bit set describing a list or list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ListFlags(u8);

impl ListFlags {
    /// Numbered list.
    pub const ORDERED: Self = Self(1 << 0);
    /// Definition list.
    pub const DEFINITION: Self = Self(1 << 1);
    /// Item is a term of a definition list.
    pub const TERM: Self = Self(1 << 2);
    /// Item holds block-level content.
    pub const CONTAINS_BLOCK: Self = Self(1 << 3);
    /// First item of its list.
    pub const BEGINNING_OF_LIST: Self = Self(1 << 4);
    /// Last item of its list.
    pub const END_OF_LIST: Self = Self(1 << 5);

    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for ListFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ListFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Fields shared by `List` and `Item` nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListData<'a> {
    pub flags: ListFlags,
    /// Skip the paragraph wrapper around item content.
    pub tight: bool,
    /// `*`, `+` or `-` in bullet lists, 0 otherwise.
    pub bullet_char: u8,
    /// `.` or `)` after the number in ordered lists, 0 otherwise.
    pub delimiter: u8,
    /// Raw footnote reference. When set, the item is a footnote entry.
    pub ref_link: Option<&'a str>,
    /// This is the list of footnotes.
    pub is_footnotes_list: bool,
}

impl<'a> ListData<'a> {
    /// A bullet list using `bullet_char`.
    pub const fn bullet(bullet_char: u8) -> Self {
        Self {
            flags: ListFlags::empty(),
            tight: false,
            bullet_char,
            delimiter: 0,
            ref_link: None,
            is_footnotes_list: false,
        }
    }

    /// An ordered list whose numbers are followed by `delimiter`.
    pub const fn ordered(delimiter: u8) -> Self {
        Self {
            flags: ListFlags::ORDERED,
            tight: false,
            bullet_char: 0,
            delimiter,
            ref_link: None,
            is_footnotes_list: false,
        }
    }

    #[inline]
    pub const fn is_ordered(&self) -> bool {
        self.flags.contains(ListFlags::ORDERED)
    }

    #[inline]
    pub const fn is_footnote(&self) -> bool {
        self.ref_link.is_some()
    }
}

/// Fields of a `Heading` node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadingData<'a> {
    /// 1..=6 for regular headings, larger for extended ones.
    pub level: u8,
    pub heading_id: Option<&'a str>,
    pub is_titleblock: bool,
}

/// Fields of a `Link` node.
///
/// `footnote` is a lookup edge, not a structural one: it is never walked,
/// never counted as a child and may go stale if its target is detached.
/// Use [`Node::live_footnote`] to read it safely.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkData<'a> {
    pub destination: &'a str,
    pub title: &'a str,
    /// Footnote serial number, 0 when this is not a footnote reference.
    pub note_id: usize,
    /// Footnote definition node. `Some` only when `note_id != 0`.
    pub footnote: Option<&'a Node<'a>>,
}

impl<'a> LinkData<'a> {
    pub const fn new(destination: &'a str, title: &'a str) -> Self {
        Self {
            destination,
            title,
            note_id: 0,
            footnote: None,
        }
    }

    /// A footnote reference pointing at its definition.
    ///
    /// `note_id` must be non-zero.
    pub fn footnote(destination: &'a str, note_id: usize, definition: &'a Node<'a>) -> Self {
        debug_assert!(note_id != 0, "footnote serial numbers start at 1");
        Self {
            destination,
            title: "",
            note_id,
            footnote: Some(definition),
        }
    }

    #[inline]
    pub const fn is_footnote(&self) -> bool {
        self.note_id != 0
    }
}

/// Fields of an `Image` node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageData<'a> {
    pub destination: &'a str,
    pub title: &'a str,
}

/// Fields of a `CodeBlock` node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeBlockData<'a> {
    /// Fenced (true) or indented (false).
    pub is_fenced: bool,
    pub info: &'a str,
    pub fence_char: u8,
    pub fence_length: usize,
    pub fence_offset: usize,
}

/// Column alignment of a table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlign {
    #[default]
    None,
    Left,
    Right,
    Center,
}

/// Fields of a `TableCell` node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCellData {
    /// Cell belongs to the header row.
    pub is_header: bool,
    pub align: CellAlign,
}

impl<'a> NodeData<'a> {
    /// Returns the kind tag of this payload.
    pub const fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document => NodeKind::Document,
            NodeData::BlockQuote => NodeKind::BlockQuote,
            NodeData::List(_) => NodeKind::List,
            NodeData::Item(_) => NodeKind::Item,
            NodeData::Paragraph => NodeKind::Paragraph,
            NodeData::Heading(_) => NodeKind::Heading,
            NodeData::HorizontalRule => NodeKind::HorizontalRule,
            NodeData::Emph => NodeKind::Emph,
            NodeData::Strong => NodeKind::Strong,
            NodeData::Del => NodeKind::Del,
            NodeData::Link(_) => NodeKind::Link,
            NodeData::Image(_) => NodeKind::Image,
            NodeData::Text => NodeKind::Text,
            NodeData::HtmlBlock => NodeKind::HtmlBlock,
            NodeData::CodeBlock(_) => NodeKind::CodeBlock,
            NodeData::Softbreak => NodeKind::Softbreak,
            NodeData::Hardbreak => NodeKind::Hardbreak,
            NodeData::Code => NodeKind::Code,
            NodeData::HtmlSpan => NodeKind::HtmlSpan,
            NodeData::Table => NodeKind::Table,
            NodeData::TableHead => NodeKind::TableHead,
            NodeData::TableBody => NodeKind::TableBody,
            NodeData::TableRow => NodeKind::TableRow,
            NodeData::TableCell(_) => NodeKind::TableCell,
        }
    }

    #[inline]
    pub const fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Creates payload for a heading of the given level.
    #[inline]
    pub const fn heading(level: u8) -> Self {
        Self::Heading(HeadingData {
            level,
            heading_id: None,
            is_titleblock: false,
        })
    }

    /// Creates payload for a link.
    #[inline]
    pub const fn link(destination: &'a str, title: &'a str) -> Self {
        Self::Link(LinkData::new(destination, title))
    }

    /// Creates payload for an image.
    #[inline]
    pub const fn image(destination: &'a str, title: &'a str) -> Self {
        Self::Image(ImageData { destination, title })
    }

    /// Creates payload for a table cell.
    #[inline]
    pub const fn table_cell(is_header: bool, align: CellAlign) -> Self {
        Self::TableCell(TableCellData { is_header, align })
    }

    #[inline]
    pub const fn is_list(&self) -> bool {
        matches!(self, NodeData::List(_))
    }

    /// True for a tight `List`; false for anything else.
    #[inline]
    pub const fn is_list_tight(&self) -> bool {
        matches!(self, NodeData::List(list) if list.tight)
    }

    #[inline]
    pub const fn is_item(&self) -> bool {
        matches!(self, NodeData::Item(_))
    }

    /// True for an `Item` that is a definition-list term.
    #[inline]
    pub const fn is_item_term(&self) -> bool {
        matches!(self, NodeData::Item(item) if item.flags.contains(ListFlags::TERM))
    }

    #[inline]
    pub const fn is_link(&self) -> bool {
        matches!(self, NodeData::Link(_))
    }

    #[inline]
    pub const fn is_table_row(&self) -> bool {
        matches!(self, NodeData::TableRow)
    }

    #[inline]
    pub const fn is_table_cell(&self) -> bool {
        matches!(self, NodeData::TableCell(_))
    }

    #[inline]
    pub const fn is_block_quote(&self) -> bool {
        matches!(self, NodeData::BlockQuote)
    }

    #[inline]
    pub const fn is_document(&self) -> bool {
        matches!(self, NodeData::Document)
    }

    /// Returns the number of fields [`Self::serialize_fields`] writes.
    pub(crate) fn present_field_count(&self) -> usize {
        match self {
            NodeData::List(list) | NodeData::Item(list) => {
                3 + usize::from(list.bullet_char != 0)
                    + usize::from(list.delimiter != 0)
                    + usize::from(list.ref_link.is_some())
                    + usize::from(list.is_footnotes_list)
            }
            NodeData::Heading(heading) => {
                1 + usize::from(heading.heading_id.is_some()) + usize::from(heading.is_titleblock)
            }
            NodeData::Link(link) => {
                1 + usize::from(!link.title.is_empty()) + usize::from(link.is_footnote())
            }
            NodeData::Image(image) => 1 + usize::from(!image.title.is_empty()),
            NodeData::CodeBlock(code) => {
                1 + usize::from(!code.info.is_empty()) + if code.is_fenced { 3 } else { 0 }
            }
            NodeData::TableCell(_) => 2,
            _ => 0,
        }
    }

    /// Serializes the payload fields into the given struct serializer state.
    pub(crate) fn serialize_fields<S: serde::ser::SerializeStruct>(
        &self,
        state: &mut S,
    ) -> Result<(), S::Error> {
        match self {
            NodeData::List(list) | NodeData::Item(list) => {
                state.serialize_field("flags", &list.flags)?;
                state.serialize_field("ordered", &list.is_ordered())?;
                state.serialize_field("tight", &list.tight)?;
                if list.bullet_char != 0 {
                    state.serialize_field("bullet_char", &char::from(list.bullet_char))?;
                }
                if list.delimiter != 0 {
                    state.serialize_field("delimiter", &char::from(list.delimiter))?;
                }
                if let Some(ref_link) = list.ref_link {
                    state.serialize_field("ref_link", ref_link)?;
                }
                if list.is_footnotes_list {
                    state.serialize_field("is_footnotes_list", &true)?;
                }
            }
            NodeData::Heading(heading) => {
                state.serialize_field("level", &heading.level)?;
                if let Some(id) = heading.heading_id {
                    state.serialize_field("heading_id", id)?;
                }
                if heading.is_titleblock {
                    state.serialize_field("is_titleblock", &true)?;
                }
            }
            NodeData::Link(link) => {
                state.serialize_field("destination", link.destination)?;
                if !link.title.is_empty() {
                    state.serialize_field("title", link.title)?;
                }
                // The back-reference is represented by its serial number only.
                if link.is_footnote() {
                    state.serialize_field("note_id", &link.note_id)?;
                }
            }
            NodeData::Image(image) => {
                state.serialize_field("destination", image.destination)?;
                if !image.title.is_empty() {
                    state.serialize_field("title", image.title)?;
                }
            }
            NodeData::CodeBlock(code) => {
                state.serialize_field("is_fenced", &code.is_fenced)?;
                if !code.info.is_empty() {
                    state.serialize_field("info", code.info)?;
                }
                if code.is_fenced {
                    state.serialize_field("fence_char", &char::from(code.fence_char))?;
                    state.serialize_field("fence_length", &code.fence_length)?;
                    state.serialize_field("fence_offset", &code.fence_offset)?;
                }
            }
            NodeData::TableCell(cell) => {
                state.serialize_field("is_header", &cell.is_header)?;
                state.serialize_field("align", &cell.align)?;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(NodeData::Document.kind(), NodeKind::Document);
        assert_eq!(NodeData::heading(2).kind(), NodeKind::Heading);
        assert_eq!(NodeData::link("a", "").kind(), NodeKind::Link);
        assert_eq!(
            NodeData::table_cell(true, CellAlign::Left).kind(),
            NodeKind::TableCell
        );
        assert_eq!(NodeData::Item(ListData::default()).kind(), NodeKind::Item);
    }

    #[test]
    fn test_list_flags() {
        let mut flags = ListFlags::ORDERED | ListFlags::BEGINNING_OF_LIST;
        assert!(flags.contains(ListFlags::ORDERED));
        assert!(!flags.contains(ListFlags::TERM));

        flags |= ListFlags::TERM;
        assert!(flags.contains(ListFlags::TERM | ListFlags::ORDERED));

        flags.remove(ListFlags::ORDERED);
        assert!(!flags.contains(ListFlags::ORDERED));
        assert_eq!(flags.bits(), ListFlags::TERM.bits() | ListFlags::BEGINNING_OF_LIST.bits());
    }

    #[test]
    fn test_list_constructors() {
        let bullet = ListData::bullet(b'-');
        assert!(!bullet.is_ordered());
        assert_eq!(bullet.bullet_char, b'-');

        let ordered = ListData::ordered(b')');
        assert!(ordered.is_ordered());
        assert_eq!(ordered.delimiter, b')');
        assert!(!ordered.is_footnote());
    }

    #[test]
    fn test_list_tight_predicate() {
        let tight = NodeData::List(ListData {
            tight: true,
            ..ListData::bullet(b'*')
        });
        assert!(tight.is_list_tight());
        assert!(!NodeData::List(ListData::bullet(b'*')).is_list_tight());
        // Items are never "tight lists", even when flagged tight.
        let item = NodeData::Item(ListData {
            tight: true,
            ..ListData::default()
        });
        assert!(!item.is_list_tight());
    }

    #[test]
    fn test_item_term_predicate() {
        let term = NodeData::Item(ListData {
            flags: ListFlags::DEFINITION | ListFlags::TERM,
            ..ListData::default()
        });
        assert!(term.is_item_term());
        assert!(!NodeData::Item(ListData::default()).is_item_term());
        assert!(!NodeData::List(ListData {
            flags: ListFlags::TERM,
            ..ListData::default()
        })
        .is_item_term());
    }

    #[test]
    fn test_plain_link_is_not_footnote() {
        let link = LinkData::new("https://example.com", "Example");
        assert!(!link.is_footnote());
        assert!(link.footnote.is_none());
    }

    #[test]
    fn test_kind_predicates() {
        assert!(NodeData::List(ListData::default()).is_list());
        assert!(NodeData::Item(ListData::default()).is_item());
        assert!(NodeData::link("", "").is_link());
        assert!(NodeData::TableRow.is_table_row());
        assert!(NodeData::table_cell(false, CellAlign::None).is_table_cell());
        assert!(NodeData::BlockQuote.is_block_quote());
        assert!(NodeData::Document.is_document());
        assert!(!NodeData::Paragraph.is_document());
    }

    #[test]
    fn test_tag_only_kinds_have_no_fields() {
        for data in [
            NodeData::Document,
            NodeData::Paragraph,
            NodeData::Text,
            NodeData::Softbreak,
            NodeData::TableRow,
        ] {
            assert_eq!(data.present_field_count(), 0);
        }
    }
}
