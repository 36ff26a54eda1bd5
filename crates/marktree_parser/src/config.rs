//! Parser configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Options for [`MarkdownParser`](crate::MarkdownParser).
///
/// Every field has a default, so an empty JSON object is a valid
/// configuration. Unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Enable GitHub Flavored Markdown (tables, strikethrough, footnotes).
    pub gfm: bool,

    /// Turn `[^id]` references into footnote links. Only effective with
    /// `gfm`.
    pub footnotes: bool,

    /// Split text at line endings into `Text` / `Softbreak` nodes.
    pub split_soft_breaks: bool,

    /// Expand `{{path}}` include lines when parsing files.
    pub includes: bool,

    /// How deeply includes may nest.
    #[serde(default = "default_max_include_depth")]
    pub max_include_depth: usize,
}

fn default_max_include_depth() -> usize {
    8
}

impl ParserConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            gfm: true,
            footnotes: true,
            split_soft_breaks: true,
            includes: false,
            max_include_depth: default_max_include_depth(),
        }
    }

    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ParseError::config(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parses configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(|e| ParseError::config(format!("Invalid config: {}", e)))
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}
