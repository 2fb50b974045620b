//! Markdown format implementation using tree-sitter-md.
//!
//! Only ATX-style headings (`#` syntax) are recognised; the level comes from the marker node.

use crate::formats::Format;

/// Tree-sitter vocabulary for ATX-style markdown headings.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn heading_query(&self) -> &'static str {
        "(atx_heading) @heading"
    }

    fn title_field(&self) -> &'static str {
        "heading_content"
    }

    fn marker_level(&self, kind: &str) -> Option<usize> {
        match kind {
            "atx_h1_marker" => Some(1),
            "atx_h2_marker" => Some(2),
            "atx_h3_marker" => Some(3),
            "atx_h4_marker" => Some(4),
            "atx_h5_marker" => Some(5),
            "atx_h6_marker" => Some(6),
            _ => None,
        }
    }
}
