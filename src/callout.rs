//! Chat callout extraction.
//!
//! A chat callout is a block quote whose first line is a bare `> [!chat-r]` or `> [!chat-l]`
//! marker, followed by one or more quoted lines of text. Each such block becomes a flat,
//! level-one heading labelled with its (possibly truncated) text.
//!
//! ```text
//! > [!chat-r]            <- opener, span starts here
//! > How do I split a     <- continuation
//! > string in Rust?      <- continuation, span ends here
//! ```

use crate::heading::{HeadingOrigin, HeadingRecord};
use crate::line_index::LineIndex;
use regex::Regex;
use std::sync::LazyLock;

/// Outline level given to every callout heading.
pub const CALLOUT_LEVEL: usize = 1;
/// Longest label, in characters, before truncation kicks in.
pub const MAX_HEADING_CHARS: usize = 80;
/// Marker appended to truncated labels.
pub const ELLIPSIS: &str = "...";

static OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^> \[!chat-[rl]\]\s*$").unwrap_or_else(|e| panic!("invalid opener pattern: {e}"))
});

static CONTINUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^> [^\r\n\x{2028}\x{2029}]")
        .unwrap_or_else(|e| panic!("invalid continuation pattern: {e}"))
});

const QUOTE_PREFIX_LEN: usize = 2;

#[must_use]
/// Whether `line` is a chat callout marker carrying no text of its own.
pub fn is_opener(line: &str) -> bool {
    OPENER.is_match(line)
}

#[must_use]
/// Whether `line` is a quoted line with at least one non-terminator character after `"> "`.
///
/// A `"> "` followed only by `\r` counts as blank, so CRLF and LF text end blocks alike.
pub fn is_continuation(line: &str) -> bool {
    CONTINUATION.is_match(line)
}

#[must_use]
/// Scans `text` for chat callouts and returns one heading per non-empty block, in order.
///
/// The scan is pure: the same text always yields the same headings, and text without any
/// marker line yields none.
pub fn extract(text: &str) -> Vec<HeadingRecord> {
    let lines: Vec<&str> = text.split('\n').collect();
    let index = LineIndex::new(text);
    let mut headings = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        if !is_opener(lines[i]) {
            i += 1;
            continue;
        }

        let parts: Vec<&str> = lines[i + 1..]
            .iter()
            .take_while(|line| is_continuation(line))
            .map(|line| {
                let body = &line[QUOTE_PREFIX_LEN..];
                body.strip_suffix('\r').unwrap_or(body)
            })
            .collect();

        if parts.is_empty() {
            i += 1;
            continue;
        }

        let end_line = i + parts.len();
        if let Some(span) = index.span(i, end_line) {
            headings.push(HeadingRecord {
                text: truncate_label(parts.join(" ").trim()),
                level: CALLOUT_LEVEL,
                span,
                origin: HeadingOrigin::Callout,
            });
        }
        i = end_line + 1;
    }

    tracing::trace!(count = headings.len(), "extracted callout headings");
    headings
}

#[must_use]
/// Shortens `raw` to at most [`MAX_HEADING_CHARS`] characters, ending in [`ELLIPSIS`] if cut.
pub fn truncate_label(raw: &str) -> String {
    if raw.chars().count() <= MAX_HEADING_CHARS {
        return raw.to_string();
    }
    let keep = MAX_HEADING_CHARS - ELLIPSIS.chars().count();
    let mut label: String = raw.chars().take(keep).collect();
    label.push_str(ELLIPSIS);
    label
}

#[cfg(test)]
#[path = "tests/callout.rs"]
mod tests;
