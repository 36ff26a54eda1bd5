//! Markdown parser using markdown-rs (wooorm/markdown-rs).
//!
//! The `markdown` crate produces an mdast tree; this module rebuilds it as
//! a marktree document through the tree's mutation primitives, consulting
//! the containment policy before every attach.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use markdown::mdast::{self, AlignKind};
use markdown::{ParseOptions, to_mdast};
use marktree_ast::{
    AstArena, CellAlign, CodeBlockData, LinkData, ListData, ListFlags, Node, NodeData, can_contain,
};
use tracing::{debug, trace, warn};

use crate::{ParseError, Parser, ParserConfig, expand_includes};

/// Markdown parser implementation.
///
/// Uses `markdown-rs` for parsing, which supports:
/// - CommonMark
/// - GFM (GitHub Flavored Markdown), including footnotes
///
/// Footnote references become `Link` nodes numbered in order of first
/// reference. Their definitions are collected into a trailing footnotes
/// `List` whose items the links point back to.
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser {
    config: ParserConfig,
}

impl MarkdownParser {
    /// Creates a new Markdown parser with default options.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Creates a parser using `config`.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Reads and parses a file, expanding `{{path}}` includes first when
    /// [`ParserConfig::includes`] is set.
    pub fn parse_file<'a>(
        &self,
        arena: &'a AstArena,
        path: impl AsRef<Path>,
    ) -> Result<&'a Node<'a>, ParseError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| ParseError::io(path, e))?;

        if !self.config.includes {
            return self.parse(arena, &source);
        }
        let wd = path.parent().unwrap_or_else(|| Path::new(""));
        let expanded = expand_includes(&source, wd, &self.config)?;
        self.parse(arena, &expanded)
    }

    fn options(&self) -> ParseOptions {
        let mut options = if self.config.gfm {
            ParseOptions::gfm()
        } else {
            ParseOptions::default()
        };
        if !self.config.footnotes {
            options.constructs.gfm_footnote_definition = false;
            options.constructs.gfm_label_start_footnote = false;
        }
        options
    }
}

impl Parser for MarkdownParser {
    fn name(&self) -> &str {
        "markdown"
    }

    fn extensions(&self) -> &[&str] {
        &["md", "markdown", "mdown", "mkdn", "mkd"]
    }

    fn parse<'a>(&self, arena: &'a AstArena, source: &str) -> Result<&'a Node<'a>, ParseError> {
        let mdast =
            to_mdast(source, &self.options()).map_err(|e| ParseError::invalid_source(e.to_string()))?;

        let mut converter = Converter::new(arena, source, &self.config);
        converter.collect_definitions(&mdast);

        let document = arena.alloc_node(NodeData::Document);
        if let Some(children) = mdast.children() {
            converter.schedule(document, children);
            converter.drain()?;
        }
        converter.finish_footnotes(document)?;
        document.close();

        trace!(
            bytes = source.len(),
            nodes = converter.created,
            footnotes = converter.pending.len(),
            "parsed markdown"
        );
        Ok(document)
    }
}

/// State for one mdast -> marktree conversion.
struct Converter<'a, 'm> {
    arena: &'a AstArena,
    source: &'m str,
    split_soft_breaks: bool,
    footnote_defs: HashMap<&'m str, &'m mdast::FootnoteDefinition>,
    /// Footnote item, serial number and arena copy of the identifier.
    notes: HashMap<&'m str, (&'a Node<'a>, usize, &'a str)>,
    /// Referenced definitions in reference order, not yet attached.
    pending: Vec<(&'m mdast::FootnoteDefinition, &'a Node<'a>)>,
    work: Vec<Step<'a, 'm>>,
    created: usize,
}

/// A unit of conversion work. Nested mdast nodes are queued instead of
/// converted recursively, so document depth never reaches the call stack.
enum Step<'a, 'm> {
    /// Converts an mdast node under a parent.
    Convert(&'a Node<'a>, &'m mdast::Node),
    /// Attaches a container, then queues its children.
    Container(&'a Node<'a>, NodeData<'a>, &'m [mdast::Node]),
    /// Same as `Container`, keeping the raw inline markup as content.
    InlineBlock(&'a Node<'a>, NodeData<'a>, &'m [mdast::Node]),
    Row {
        section: &'a Node<'a>,
        cells: &'m [mdast::Node],
        is_header: bool,
        align: &'m [AlignKind],
    },
    /// Closes a node once everything queued after it has run.
    Close(&'a Node<'a>),
    /// Flags the first and last item, then closes the list.
    FinishList(&'a Node<'a>),
}

impl<'a, 'm> Converter<'a, 'm> {
    fn new(arena: &'a AstArena, source: &'m str, config: &ParserConfig) -> Self {
        Self {
            arena,
            source,
            split_soft_breaks: config.split_soft_breaks,
            footnote_defs: HashMap::new(),
            notes: HashMap::new(),
            pending: Vec::new(),
            work: Vec::new(),
            created: 0,
        }
    }

    /// Indexes footnote definitions. The first definition of an identifier
    /// wins.
    fn collect_definitions(&mut self, root: &'m mdast::Node) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if let mdast::Node::FootnoteDefinition(def) = node {
                self.footnote_defs
                    .entry(def.identifier.as_str())
                    .or_insert(def);
            }
            if let Some(children) = node.children() {
                stack.extend(children.iter().rev());
            }
        }
    }

    /// Queues `children` for conversion under `parent`, in order.
    fn schedule(&mut self, parent: &'a Node<'a>, children: &'m [mdast::Node]) {
        self.work
            .extend(children.iter().rev().map(|child| Step::Convert(parent, child)));
    }

    /// Runs queued steps until the queue is empty.
    fn drain(&mut self) -> Result<(), ParseError> {
        while let Some(step) = self.work.pop() {
            match step {
                Step::Convert(parent, node) => self.convert(parent, node)?,
                Step::Container(parent, data, children) => {
                    self.container(parent, data, children)?
                }
                Step::InlineBlock(parent, data, children) => {
                    self.inline_block(parent, data, children)?
                }
                Step::Row {
                    section,
                    cells,
                    is_header,
                    align,
                } => self.table_row(section, cells, is_header, align)?,
                Step::Close(node) => node.close(),
                Step::FinishList(list) => {
                    mark_list_bounds(list);
                    list.close();
                }
            }
        }
        Ok(())
    }

    fn convert(&mut self, parent: &'a Node<'a>, node: &'m mdast::Node) -> Result<(), ParseError> {
        use markdown::mdast::Node as Md;

        match node {
            Md::Blockquote(quote) => self.container(parent, NodeData::BlockQuote, &quote.children),

            Md::List(list) => self.list(parent, node, list),

            // Only reached for items outside a list; the policy rejects them.
            Md::ListItem(item) => {
                self.container(parent, NodeData::Item(ListData::default()), &item.children)
            }

            Md::Paragraph(para) => self.inline_block(parent, NodeData::Paragraph, &para.children),

            Md::Heading(heading) => {
                self.inline_block(parent, NodeData::heading(heading.depth), &heading.children)
            }

            Md::ThematicBreak(_) => self.leaf(parent, NodeData::HorizontalRule, None),

            Md::Code(code) => {
                let data = self.code_block_data(node, code);
                self.leaf(parent, NodeData::CodeBlock(data), Some(&code.value))
            }

            Md::Html(html) => {
                let data = if parent.kind().has_containment_rules() {
                    NodeData::HtmlBlock
                } else {
                    NodeData::HtmlSpan
                };
                self.leaf(parent, data, Some(&html.value))
            }

            Md::Table(table) => self.table(parent, table),

            Md::TableRow(row) => self.table_row(parent, &row.children, false, &[]),

            Md::TableCell(cell) => {
                self.inline_block(parent, NodeData::table_cell(false, CellAlign::None), &cell.children)
            }

            Md::Text(text) => self.text(parent, &text.value),

            Md::Emphasis(em) => self.container(parent, NodeData::Emph, &em.children),

            Md::Strong(strong) => self.container(parent, NodeData::Strong, &strong.children),

            Md::Delete(del) => self.container(parent, NodeData::Del, &del.children),

            Md::InlineCode(code) => self.leaf(parent, NodeData::Code, Some(&code.value)),

            Md::Break(_) => self.leaf(parent, NodeData::Hardbreak, None),

            Md::Link(link) => {
                let data = NodeData::link(
                    self.arena.alloc_str(&link.url),
                    self.arena.alloc_str(link.title.as_deref().unwrap_or("")),
                );
                self.container(parent, data, &link.children)
            }

            Md::Image(image) => self.image(parent, &image.url, image.title.as_deref(), &image.alt),

            // Reference links are not resolved; their text stays inline.
            Md::LinkReference(reference) => {
                debug!(identifier = %reference.identifier, "keeping link reference as text");
                self.schedule(parent, &reference.children);
                Ok(())
            }

            Md::ImageReference(reference) => {
                debug!(identifier = %reference.identifier, "keeping image reference as text");
                self.text(parent, &reference.alt)
            }

            Md::FootnoteReference(reference) => self.footnote_reference(parent, reference),

            // Link definitions are dropped; footnote definitions are attached
            // by `finish_footnotes`.
            Md::Definition(_) | Md::FootnoteDefinition(_) => Ok(()),

            Md::Root(root) => {
                self.schedule(parent, &root.children);
                Ok(())
            }

            other => {
                debug!(node = unsupported_name(other), "skipping unsupported markdown node");
                Ok(())
            }
        }
    }

    /// Allocates a node, checks the policy and appends it to `parent`.
    fn attach(
        &mut self,
        parent: &'a Node<'a>,
        data: NodeData<'a>,
    ) -> Result<&'a Node<'a>, ParseError> {
        let node = self.arena.alloc_node(data);
        self.adopt(parent, node)?;
        Ok(node)
    }

    fn adopt(&mut self, parent: &'a Node<'a>, node: &'a Node<'a>) -> Result<(), ParseError> {
        let (parent_kind, child_kind) = (parent.kind(), node.kind());
        if parent_kind.has_containment_rules() && !can_contain(parent_kind, child_kind) {
            warn!(parent = %parent_kind, child = %child_kind, "containment violation");
            return Err(ParseError::Containment {
                parent: parent_kind,
                child: child_kind,
            });
        }
        parent.append_child(node)?;
        self.created += 1;
        Ok(())
    }

    fn container(
        &mut self,
        parent: &'a Node<'a>,
        data: NodeData<'a>,
        children: &'m [mdast::Node],
    ) -> Result<(), ParseError> {
        let node = self.attach(parent, data)?;
        self.work.push(Step::Close(node));
        self.schedule(node, children);
        Ok(())
    }

    /// A block whose children are inline. Keeps the raw inline markup in
    /// the node's content buffer.
    fn inline_block(
        &mut self,
        parent: &'a Node<'a>,
        data: NodeData<'a>,
        children: &'m [mdast::Node],
    ) -> Result<(), ParseError> {
        let node = self.attach(parent, data)?;
        let start = children.first().and_then(mdast::Node::position);
        let end = children.last().and_then(mdast::Node::position);
        if let Some(raw) = start
            .zip(end)
            .and_then(|(start, end)| self.source.get(start.start.offset..end.end.offset))
        {
            node.push_content(raw)?;
        }
        self.work.push(Step::Close(node));
        self.schedule(node, children);
        Ok(())
    }

    fn leaf(
        &mut self,
        parent: &'a Node<'a>,
        data: NodeData<'a>,
        literal: Option<&str>,
    ) -> Result<(), ParseError> {
        let node = self.attach(parent, data)?;
        if let Some(literal) = literal {
            node.set_literal(self.arena.alloc_str(literal));
        }
        node.close();
        Ok(())
    }

    fn text(&mut self, parent: &'a Node<'a>, value: &str) -> Result<(), ParseError> {
        if !self.split_soft_breaks {
            return self.leaf(parent, NodeData::Text, Some(value));
        }
        for (i, segment) in value.split('\n').enumerate() {
            if i > 0 {
                self.leaf(parent, NodeData::Softbreak, None)?;
            }
            if !segment.is_empty() {
                self.leaf(parent, NodeData::Text, Some(segment))?;
            }
        }
        Ok(())
    }

    fn image(
        &mut self,
        parent: &'a Node<'a>,
        url: &str,
        title: Option<&str>,
        alt: &str,
    ) -> Result<(), ParseError> {
        let data = NodeData::image(
            self.arena.alloc_str(url),
            self.arena.alloc_str(title.unwrap_or("")),
        );
        let node = self.attach(parent, data)?;
        if !alt.is_empty() {
            self.leaf(node, NodeData::Text, Some(alt))?;
        }
        node.close();
        Ok(())
    }

    fn list(
        &mut self,
        parent: &'a Node<'a>,
        node: &'m mdast::Node,
        list: &'m mdast::List,
    ) -> Result<(), ParseError> {
        let marker = node
            .position()
            .and_then(|pos| self.source.get(pos.start.offset..))
            .and_then(list_marker);
        let mut data = if list.ordered {
            ListData::ordered(marker.unwrap_or(b'.'))
        } else {
            ListData::bullet(marker.unwrap_or(b'-'))
        };
        data.tight = !list.spread;

        let list_node = self.attach(parent, NodeData::List(data))?;
        self.work.push(Step::FinishList(list_node));
        for child in list.children.iter().rev() {
            let step = match child {
                mdast::Node::ListItem(item) => {
                    let mut item_data = data;
                    if item.spread {
                        item_data.flags.insert(ListFlags::CONTAINS_BLOCK);
                    }
                    Step::Container(list_node, NodeData::Item(item_data), &item.children)
                }
                other => Step::Convert(list_node, other),
            };
            self.work.push(step);
        }
        Ok(())
    }

    fn code_block_data(&self, node: &mdast::Node, code: &mdast::Code) -> CodeBlockData<'a> {
        let info = match (&code.lang, &code.meta) {
            (Some(lang), Some(meta)) => self.arena.alloc_str(&format!("{} {}", lang, meta)),
            (Some(lang), None) => self.arena.alloc_str(lang),
            (None, _) => "",
        };

        // markdown-rs starts a fenced block at the fence and an indented
        // one before its indentation, so four leading spaces inside the
        // node mean indented code. The offset also counts spaces before the
        // node on its line.
        let start = node.position().map_or(0, |pos| pos.start.offset);
        let line_start = self
            .source
            .get(..start)
            .and_then(|before| before.rfind('\n'))
            .map_or(0, |i| i + 1);
        let before = self.source.get(line_start..start).unwrap_or("");
        let rest = self.source.get(start..).unwrap_or("");
        let fence = rest.trim_start_matches(' ');
        let lead = rest.len() - fence.len();
        let fence_offset = before.len() - before.trim_end_matches(' ').len() + lead;
        let fence_char = fence.bytes().next().filter(|c| matches!(c, b'`' | b'~'));
        let fence_length = fence_char.map_or(0, |c| fence.bytes().take_while(|&b| b == c).count());

        match fence_char {
            Some(fence_char) if fence_length >= 3 && lead <= 3 => CodeBlockData {
                is_fenced: true,
                info,
                fence_char,
                fence_length,
                fence_offset,
            },
            _ => CodeBlockData {
                info,
                ..CodeBlockData::default()
            },
        }
    }

    /// Attaches the table and its sections right away; rows are queued.
    fn table(&mut self, parent: &'a Node<'a>, table: &'m mdast::Table) -> Result<(), ParseError> {
        let node = self.attach(parent, NodeData::Table)?;
        let (head, body) = match table.children.split_first() {
            Some((head, body)) => (Some(head), body),
            None => (None, &[][..]),
        };
        let head = match head {
            Some(row) => Some((self.attach(node, NodeData::TableHead)?, row)),
            None => None,
        };
        let body_section = if body.is_empty() {
            None
        } else {
            Some(self.attach(node, NodeData::TableBody)?)
        };

        self.work.push(Step::Close(node));
        if let Some(section) = body_section {
            self.work.push(Step::Close(section));
            for row in body.iter().rev() {
                self.work.push(row_step(section, row, false, &table.align));
            }
        }
        if let Some((section, row)) = head {
            self.work.push(Step::Close(section));
            self.work.push(row_step(section, row, true, &table.align));
        }
        Ok(())
    }

    fn table_row(
        &mut self,
        parent: &'a Node<'a>,
        cells: &'m [mdast::Node],
        is_header: bool,
        align: &[AlignKind],
    ) -> Result<(), ParseError> {
        let row = self.attach(parent, NodeData::TableRow)?;
        self.work.push(Step::Close(row));
        for (column, cell) in cells.iter().enumerate().rev() {
            let step = match cell {
                mdast::Node::TableCell(cell) => {
                    let align = align.get(column).map_or(CellAlign::None, cell_align);
                    Step::InlineBlock(row, NodeData::table_cell(is_header, align), &cell.children)
                }
                other => Step::Convert(row, other),
            };
            self.work.push(step);
        }
        Ok(())
    }

    fn footnote_reference(
        &mut self,
        parent: &'a Node<'a>,
        reference: &'m mdast::FootnoteReference,
    ) -> Result<(), ParseError> {
        let id = reference.identifier.as_str();
        let (item, note_id, destination) = match self.notes.get(id).copied() {
            Some(note) => note,
            None => {
                let Some(definition) = self.footnote_defs.get(id).copied() else {
                    warn!(identifier = id, "footnote reference without definition");
                    let label = reference.label.as_deref().unwrap_or(id);
                    return self.leaf(parent, NodeData::Text, Some(&format!("[^{}]", label)));
                };
                let destination = self.arena.alloc_str(id);
                let mut data = ListData::ordered(b'.');
                data.ref_link = Some(destination);
                let item = self.arena.alloc_node(NodeData::Item(data));
                let note = (item, self.pending.len() + 1, destination);
                self.pending.push((definition, item));
                self.notes.insert(id, note);
                note
            }
        };

        let link = self.attach(parent, NodeData::Link(LinkData::footnote(destination, note_id, item)))?;
        link.close();
        Ok(())
    }

    /// Appends the footnotes list to `document`. Definitions may reference
    /// further footnotes, so the pending queue can grow while it drains.
    fn finish_footnotes(&mut self, document: &'a Node<'a>) -> Result<(), ParseError> {
        if !self.pending.is_empty() {
            let mut data = ListData::ordered(b'.');
            data.is_footnotes_list = true;
            let list = self.attach(document, NodeData::List(data))?;

            let mut next = 0;
            while let Some(&(definition, item)) = self.pending.get(next) {
                self.adopt(list, item)?;
                self.work.push(Step::Close(item));
                self.schedule(item, &definition.children);
                self.drain()?;
                next += 1;
            }

            mark_list_bounds(list);
            list.close();
        }

        for id in self.footnote_defs.keys() {
            if !self.notes.contains_key(id) {
                debug!(identifier = *id, "dropping unreferenced footnote definition");
            }
        }
        Ok(())
    }
}

fn row_step<'a, 'm>(
    section: &'a Node<'a>,
    row: &'m mdast::Node,
    is_header: bool,
    align: &'m [AlignKind],
) -> Step<'a, 'm> {
    match row {
        mdast::Node::TableRow(row) => Step::Row {
            section,
            cells: &row.children,
            is_header,
            align,
        },
        other => Step::Convert(section, other),
    }
}

/// Flags the first and last item of `list`.
fn mark_list_bounds(list: &Node<'_>) {
    if let Some(first) = list.first_child() {
        if let NodeData::Item(data) = &mut *first.data_mut() {
            data.flags.insert(ListFlags::BEGINNING_OF_LIST);
        }
    }
    if let Some(last) = list.last_child() {
        if let NodeData::Item(data) = &mut *last.data_mut() {
            data.flags.insert(ListFlags::END_OF_LIST);
        }
    }
}

/// Reads the bullet character or ordered delimiter at the start of a list.
fn list_marker(rest: &str) -> Option<u8> {
    let bytes = rest.trim_start_matches([' ', '\t']).as_bytes();
    match *bytes.first()? {
        c @ (b'-' | b'+' | b'*') => Some(c),
        b'0'..=b'9' => bytes
            .iter()
            .copied()
            .find(|b| !b.is_ascii_digit())
            .filter(|b| matches!(b, b'.' | b')')),
        _ => None,
    }
}

fn cell_align(align: &AlignKind) -> CellAlign {
    match align {
        AlignKind::Left => CellAlign::Left,
        AlignKind::Right => CellAlign::Right,
        AlignKind::Center => CellAlign::Center,
        AlignKind::None => CellAlign::None,
    }
}

fn unsupported_name(node: &mdast::Node) -> &'static str {
    use markdown::mdast::Node as Md;

    match node {
        Md::Math(_) | Md::InlineMath(_) => "math",
        Md::Yaml(_) | Md::Toml(_) => "frontmatter",
        Md::MdxjsEsm(_)
        | Md::MdxFlowExpression(_)
        | Md::MdxTextExpression(_)
        | Md::MdxJsxFlowElement(_)
        | Md::MdxJsxTextElement(_) => "mdx",
        _ => "other",
    }
}
