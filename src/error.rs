//! Errors raised while reading documents and extracting native headings.
//!
//! None of these escape the engine's trigger handling; they surface only from the
//! lower-level reading and parsing functions.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
/// Failure while reading or parsing a document.
pub enum Error {
    /// Document text could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Document that failed to read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The tree-sitter grammar was rejected by the parser.
    #[error("incompatible tree-sitter grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    /// A heading query did not compile against the grammar.
    #[error("invalid heading query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    /// The parser gave up without producing a syntax tree.
    #[error("parser produced no syntax tree")]
    Parse,
}

impl Error {
    /// Wraps an I/O failure with the path it concerns.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
