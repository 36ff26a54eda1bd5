//! Node kind definitions.
//!
//! `NodeKind` is the field-less tag of [`NodeData`](crate::NodeData). It is
//! what the containment policy and diagnostics dispatch on.

use serde::{Deserialize, Serialize};

/// The kind of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum NodeKind {
    // Block elements
    /// Root document node.
    Document,
    /// Block quote.
    BlockQuote,
    /// Ordered, unordered or definition list.
    List,
    /// Item in a list (or a footnote entry).
    Item,
    /// Paragraph containing inline content.
    Paragraph,
    /// Heading.
    Heading,
    /// Horizontal rule / thematic break.
    HorizontalRule,
    /// Raw HTML block.
    HtmlBlock,
    /// Fenced or indented code block.
    CodeBlock,

    // Inline elements
    /// Emphasis.
    Emph,
    /// Strong emphasis.
    Strong,
    /// Strikethrough.
    Del,
    /// Hyperlink or footnote reference.
    Link,
    /// Image.
    Image,
    /// Plain text run.
    Text,
    /// Soft line break.
    Softbreak,
    /// Hard line break.
    Hardbreak,
    /// Inline code.
    Code,
    /// Raw HTML span.
    HtmlSpan,

    // Table elements
    /// Table.
    Table,
    /// Table header section.
    TableHead,
    /// Table body section.
    TableBody,
    /// Table row.
    TableRow,
    /// Table cell.
    TableCell,
}

impl NodeKind {
    /// Every node kind, in declaration order.
    pub const ALL: [NodeKind; 24] = [
        NodeKind::Document,
        NodeKind::BlockQuote,
        NodeKind::List,
        NodeKind::Item,
        NodeKind::Paragraph,
        NodeKind::Heading,
        NodeKind::HorizontalRule,
        NodeKind::HtmlBlock,
        NodeKind::CodeBlock,
        NodeKind::Emph,
        NodeKind::Strong,
        NodeKind::Del,
        NodeKind::Link,
        NodeKind::Image,
        NodeKind::Text,
        NodeKind::Softbreak,
        NodeKind::Hardbreak,
        NodeKind::Code,
        NodeKind::HtmlSpan,
        NodeKind::Table,
        NodeKind::TableHead,
        NodeKind::TableBody,
        NodeKind::TableRow,
        NodeKind::TableCell,
    ];

    /// Returns true if nodes of this kind may have children.
    #[inline]
    pub const fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Document
                | NodeKind::BlockQuote
                | NodeKind::List
                | NodeKind::Item
                | NodeKind::Paragraph
                | NodeKind::Heading
                | NodeKind::Emph
                | NodeKind::Strong
                | NodeKind::Del
                | NodeKind::Link
                | NodeKind::Image
                | NodeKind::Table
                | NodeKind::TableHead
                | NodeKind::TableBody
                | NodeKind::TableRow
                | NodeKind::TableCell
        )
    }

    /// Returns true if [`can_contain`](crate::can_contain) has rules for
    /// children of this kind.
    ///
    /// Inline containers (paragraphs, emphasis, links, ...) are containers
    /// but the policy table does not govern what goes inside them.
    #[inline]
    pub const fn has_containment_rules(&self) -> bool {
        matches!(
            self,
            NodeKind::Document
                | NodeKind::BlockQuote
                | NodeKind::List
                | NodeKind::Item
                | NodeKind::Table
                | NodeKind::TableHead
                | NodeKind::TableBody
                | NodeKind::TableRow
        )
    }

    /// Returns true if this is a block-level kind.
    #[inline]
    pub const fn is_block(&self) -> bool {
        matches!(
            self,
            NodeKind::Document
                | NodeKind::BlockQuote
                | NodeKind::List
                | NodeKind::Item
                | NodeKind::Paragraph
                | NodeKind::Heading
                | NodeKind::HorizontalRule
                | NodeKind::HtmlBlock
                | NodeKind::CodeBlock
                | NodeKind::Table
                | NodeKind::TableHead
                | NodeKind::TableBody
                | NodeKind::TableRow
                | NodeKind::TableCell
        )
    }

    /// Returns the kind name, matching the serde representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::BlockQuote => "BlockQuote",
            NodeKind::List => "List",
            NodeKind::Item => "Item",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::Heading => "Heading",
            NodeKind::HorizontalRule => "HorizontalRule",
            NodeKind::HtmlBlock => "HtmlBlock",
            NodeKind::CodeBlock => "CodeBlock",
            NodeKind::Emph => "Emph",
            NodeKind::Strong => "Strong",
            NodeKind::Del => "Del",
            NodeKind::Link => "Link",
            NodeKind::Image => "Image",
            NodeKind::Text => "Text",
            NodeKind::Softbreak => "Softbreak",
            NodeKind::Hardbreak => "Hardbreak",
            NodeKind::Code => "Code",
            NodeKind::HtmlSpan => "HtmlSpan",
            NodeKind::Table => "Table",
            NodeKind::TableHead => "TableHead",
            NodeKind::TableBody => "TableBody",
            NodeKind::TableRow => "TableRow",
            NodeKind::TableCell => "TableCell",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
