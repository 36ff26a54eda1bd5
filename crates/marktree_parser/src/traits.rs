//! Parser trait definition.

use marktree_ast::{AstArena, Node};

use crate::ParseError;

/// Trait for producing a marktree document from source text.
///
/// # Example
///
/// ```rust
/// use marktree_ast::{AstArena, Node, NodeData};
/// use marktree_parser::{ParseError, Parser};
///
/// /// Every line becomes a paragraph.
/// struct LineParser;
///
/// impl Parser for LineParser {
///     fn name(&self) -> &str {
///         "lines"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["txt"]
///     }
///
///     fn parse<'a>(
///         &self,
///         arena: &'a AstArena,
///         source: &str,
///     ) -> Result<&'a Node<'a>, ParseError> {
///         let doc = arena.alloc_node(NodeData::Document);
///         for line in source.lines() {
///             let para = arena.alloc_node(NodeData::Paragraph);
///             let text = arena.alloc_node(NodeData::Text);
///             text.set_literal(arena.alloc_str(line));
///             para.append_child(text)?;
///             doc.append_child(para)?;
///         }
///         Ok(doc)
///     }
/// }
///
/// let arena = AstArena::new();
/// let doc = LineParser.parse(&arena, "a\nb").unwrap();
/// assert_eq!(doc.children().count(), 2);
/// assert!(LineParser.can_parse("TXT"));
/// ```
pub trait Parser {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles.
    ///
    /// Extensions should not include the leading dot (e.g., `["md", "markdown"]`).
    fn extensions(&self) -> &[&str];

    /// Parses the source text into a document allocated in `arena`.
    ///
    /// Returns the root node of the new document.
    fn parse<'a>(&self, arena: &'a AstArena, source: &str) -> Result<&'a Node<'a>, ParseError>;

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
