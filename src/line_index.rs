//! Line table for converting line numbers into character-based positions.
//!
//! Lines are split on `\n` only and each consumed line advances the running offset by its
//! length plus one for the separator, which is the model both extractors share.

use crate::heading::{Position, Span};

#[derive(Clone, Debug, Default)]
/// Character start and length of every line in a text.
pub struct LineIndex {
    lines: Vec<LineExtent>,
}

#[derive(Clone, Copy, Debug)]
struct LineExtent {
    start: usize,
    len: usize,
}

impl LineIndex {
    #[must_use]
    /// Measures every line of `text`.
    pub fn new(text: &str) -> Self {
        let mut offset = 0;
        let lines = text
            .split('\n')
            .map(|line| {
                let len = line.chars().count();
                let extent = LineExtent { start: offset, len };
                offset += len + 1;
                extent
            })
            .collect();
        Self { lines }
    }

    #[must_use]
    /// Number of lines, counting the (possibly empty) segment after a final newline.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    /// Whether the index holds no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    /// Position of the first character of `line`.
    pub fn line_start(&self, line: usize) -> Option<Position> {
        self.lines
            .get(line)
            .map(|extent| Position::new(line, 0, extent.start))
    }

    #[must_use]
    /// Position just past the last character of `line`, where its separator sits.
    pub fn line_end(&self, line: usize) -> Option<Position> {
        self.lines
            .get(line)
            .map(|extent| Position::new(line, extent.len, extent.start + extent.len))
    }

    #[must_use]
    /// Span from the start of `first` to the end of `last`.
    pub fn span(&self, first: usize, last: usize) -> Option<Span> {
        Some(Span {
            start: self.line_start(first)?,
            end: self.line_end(last)?,
        })
    }
}

#[cfg(test)]
#[path = "tests/line_index.rs"]
mod tests;
