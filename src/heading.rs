//! Heading representation shared by native and callout-derived outline entries.
//!
//! Every heading carries a span measured in characters (not bytes) from the start of the
//! document, so that headings found by different extractors can be interleaved by position.
//! A position's offset always agrees with its line and column under the document's own line
//! lengths, counting one separator character per line.

use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
/// A point in a document.
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based character offset within the line.
    pub column: usize,
    /// Zero-based character offset from the start of the document.
    pub offset: usize,
}

impl Position {
    #[must_use]
    /// Creates a position from its three coordinates.
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.offset
            .cmp(&other.offset)
            .then_with(|| (self.line, self.column).cmp(&(other.line, other.column)))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
/// Text range a heading covers, with an inclusive end.
pub struct Span {
    /// First character of the range.
    pub start: Position,
    /// Last character of the range.
    pub end: Position,
}

impl Span {
    #[must_use]
    /// Whether a character offset falls inside the span (both ends inclusive).
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start.offset && offset <= self.end.offset
    }

    #[must_use]
    /// Cuts the covered characters out of `text`.
    ///
    /// Offsets are character offsets, so this walks the string rather than indexing bytes.
    /// Out-of-range ends are clamped to the text.
    pub fn slice(&self, text: &str) -> String {
        let len = self
            .end
            .offset
            .saturating_sub(self.start.offset)
            .saturating_add(1);
        text.chars().skip(self.start.offset).take(len).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Which extractor produced a heading.
pub enum HeadingOrigin {
    /// Discovered by the document's own heading syntax.
    Native,
    /// Synthesised from a chat callout block.
    Callout,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One outline entry.
pub struct HeadingRecord {
    /// Display label.
    pub text: String,
    /// Outline depth (1 for top-level).
    pub level: usize,
    /// Source range in the document.
    pub span: Span,
    /// Extractor that produced this entry.
    pub origin: HeadingOrigin,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
/// Stable identity of a document, normally its path.
pub struct DocumentId(String);

impl DocumentId {
    #[must_use]
    /// Wraps an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    /// Builds the identity of the document stored at `path`.
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    #[must_use]
    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    /// The identifier interpreted as a filesystem path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    #[must_use]
    /// File extension of the identifier, if it has one.
    pub fn extension(&self) -> Option<&str> {
        self.as_path().extension().and_then(|ext| ext.to_str())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Path> for DocumentId {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
