//! Format trait describing how native headings are found in a document type.
//!
//! Each format supplies a tree-sitter grammar, a query that captures whole heading nodes, the
//! field holding the heading's title, and a mapping from marker node kinds to heading levels.

pub mod markdown;

/// Grammar and node vocabulary used to extract native headings.
pub trait Format {
    /// Grammar used to parse documents of this format.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing one node per heading.
    fn heading_query(&self) -> &str;
    /// Field of a heading node holding its title text.
    fn title_field(&self) -> &str;
    /// Heading level signalled by a child node of kind `kind`, if it is a level marker.
    fn marker_level(&self, kind: &str) -> Option<usize>;
}
