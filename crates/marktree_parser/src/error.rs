//! Parse error types.

use std::io;
use std::path::PathBuf;

use marktree_ast::{NodeKind, TreeError};
use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source text is invalid.
    #[error("Invalid source: {message}")]
    InvalidSource {
        /// Error message.
        message: String,
        /// Byte offset where the error occurred.
        offset: Option<usize>,
    },

    /// The producer was about to attach a child its parent may not hold.
    #[error("{parent} node cannot contain {child} node")]
    Containment { parent: NodeKind, child: NodeKind },

    /// A mutation primitive refused an operation.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// A source or included file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Includes nested deeper than the configured limit.
    #[error("Include depth limit ({limit}) exceeded at {}", path.display())]
    IncludeDepth { path: PathBuf, limit: usize },

    /// A file includes itself, directly or through other files.
    #[error("Include cycle detected at {}", path.display())]
    IncludeCycle { path: PathBuf },

    /// The parser configuration is invalid.
    #[error("Config error: {0}")]
    Config(String),

    /// An internal parser error occurred.
    #[error("Internal parser error: {0}")]
    Internal(String),
}

impl ParseError {
    /// Creates a new invalid source error.
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource {
            message: message.into(),
            offset: None,
        }
    }

    /// Creates a new invalid source error with offset.
    pub fn invalid_source_at(message: impl Into<String>, offset: usize) -> Self {
        Self::InvalidSource {
            message: message.into(),
            offset: Some(offset),
        }
    }

    /// Creates a new I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
