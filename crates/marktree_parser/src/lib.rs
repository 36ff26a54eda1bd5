//! # marktree_parser
//!
//! Producers that build marktree documents from source text.
//!
//! This crate provides:
//! - A `Parser` trait for implementing custom producers
//! - A Markdown producer built on `markdown-rs`
//! - `{{path}}` file inclusion, expanded before parsing
//! - `ParserConfig`, loadable from JSON
//!
//! ## Architecture
//!
//! Producers never assemble links by hand. Every node is allocated in the
//! caller's [`AstArena`](marktree_ast::AstArena), checked against
//! [`can_contain`](marktree_ast::can_contain) and attached with the tree's
//! mutation primitives, then closed once its children are settled.
//!
//! ## Example
//!
//! ```rust
//! use marktree_ast::{AstArena, NodeKind};
//! use marktree_parser::{MarkdownParser, Parser};
//!
//! let arena = AstArena::new();
//! let parser = MarkdownParser::new();
//! let source = "# Hello\n\nThis is a paragraph.";
//!
//! let doc = parser.parse(&arena, source).unwrap();
//! assert_eq!(doc.kind(), NodeKind::Document);
//! assert_eq!(doc.children().count(), 2);
//! ```

mod config;
mod error;
mod include;
mod markdown;
mod traits;

pub use config::ParserConfig;
pub use error::ParseError;
pub use include::{Include, expand_includes, parse_include, update_wd};
pub use markdown::MarkdownParser;
pub use traits::Parser;
