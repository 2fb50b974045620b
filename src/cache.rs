//! Per-document store of callout headings and the merge that folds them into an outline.
//!
//! Entries are replaced wholesale on every extraction and are only dropped explicitly, so the
//! cache grows with the number of distinct documents seen in a session.

use crate::heading::{DocumentId, HeadingRecord};
use std::collections::HashMap;

#[derive(Debug, Default)]
/// Last extraction result for each document.
pub struct HeadingCache {
    entries: HashMap<DocumentId, Vec<HeadingRecord>>,
}

impl HeadingCache {
    #[must_use]
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `headings` for `doc`, discarding whatever was there before.
    pub fn put(&mut self, doc: DocumentId, headings: Vec<HeadingRecord>) {
        tracing::debug!(%doc, count = headings.len(), "caching callout headings");
        self.entries.insert(doc, headings);
    }

    #[must_use]
    /// Merges `real` with the cached headings for `doc`, ordered by start offset.
    ///
    /// The sort is stable over the concatenation `real ++ cached`, so on an exact tie a real
    /// heading stays ahead of a callout heading. Unknown documents return `real` unchanged.
    pub fn get(&self, doc: &DocumentId, mut real: Vec<HeadingRecord>) -> Vec<HeadingRecord> {
        let Some(cached) = self.entries.get(doc).filter(|cached| !cached.is_empty()) else {
            return real;
        };
        real.extend(cached.iter().cloned());
        real.sort_by_key(|heading| heading.span.start.offset);
        real
    }

    #[must_use]
    /// Cached headings for `doc`, without merging.
    pub fn headings(&self, doc: &DocumentId) -> Option<&[HeadingRecord]> {
        self.entries.get(doc).map(Vec::as_slice)
    }

    /// Forgets `doc`. Does nothing if it was never cached.
    pub fn drop(&mut self, doc: &DocumentId) {
        self.entries.remove(doc);
    }

    /// Forgets every document.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    /// Whether no document is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/cache.rs"]
mod tests;
