//! Native heading extraction with tree-sitter.
//!
//! These are the document's "real" headings, the ones its own markup declares. Positions are
//! reported in the same character-based model as callout headings so the two can be merged.

use crate::error::{Error, Result};
use crate::formats::Format;
use crate::heading::{HeadingOrigin, HeadingRecord};
use crate::line_index::LineIndex;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

/// Parses `text` and returns its headings in document order.
///
/// Each heading's span covers its whole source line. Headings without a title (a bare `#`)
/// get an empty label.
///
/// # Errors
///
/// Returns an error if the grammar or query is rejected, or if parsing yields no tree.
pub fn extract_headings(text: &str, format: &impl Format) -> Result<Vec<HeadingRecord>> {
    let language = format.language();
    let mut parser = Parser::new();
    parser.set_language(&language)?;
    let tree = parser.parse(text, None).ok_or(Error::Parse)?;

    let query = Query::new(&language, format.heading_query())?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), text.as_bytes());

    let index = LineIndex::new(text);
    let mut headings = Vec::new();

    while let Some(m) = matches.next() {
        for capture in m.captures {
            let node = capture.node;
            let row = node.start_position().row;

            let mut walker = node.walk();
            let level = node
                .children(&mut walker)
                .find_map(|child| format.marker_level(child.kind()))
                .unwrap_or(1);

            let title = node
                .child_by_field_name(format.title_field())
                .and_then(|title| title.utf8_text(text.as_bytes()).ok())
                .map(strip_closing_sequence)
                .unwrap_or_default();

            if let Some(span) = index.span(row, row) {
                headings.push(HeadingRecord {
                    text: title.to_string(),
                    level,
                    span,
                    origin: HeadingOrigin::Native,
                });
            }
        }
    }

    headings.sort_by_key(|heading| heading.span.start.offset);
    tracing::trace!(count = headings.len(), "extracted native headings");
    Ok(headings)
}

/// Trims `title` and drops an optional closing run of `#` from an ATX heading.
///
/// The run only counts as closing when it stands alone or follows whitespace, so `C#` keeps
/// its hash.
fn strip_closing_sequence(title: &str) -> &str {
    let trimmed = title.trim();
    let open = trimmed.trim_end_matches('#');
    if open.is_empty() || open.ends_with([' ', '\t']) {
        open.trim_end()
    } else {
        trimmed
    }
}

#[cfg(test)]
#[path = "tests/native.rs"]
mod tests;
