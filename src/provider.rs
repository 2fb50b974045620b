//! Heading lookup as a composable capability.
//!
//! Outline consumers ask a [`HeadingProvider`] for a document's headings. The host supplies
//! the native provider; [`MergedHeadings`] decorates it with callout headings from the cache,
//! so a consumer sees the same list as before plus the extra entries.

use crate::cache::HeadingCache;
use crate::formats::Format;
use crate::heading::{DocumentId, HeadingRecord};
use crate::input;
use crate::native;

/// Something that can list a document's headings.
pub trait HeadingProvider {
    /// Headings of `doc` in document order, or `None` if the provider knows nothing about it.
    fn headings(&self, doc: &DocumentId) -> Option<Vec<HeadingRecord>>;
}

impl<P: HeadingProvider + ?Sized> HeadingProvider for &P {
    fn headings(&self, doc: &DocumentId) -> Option<Vec<HeadingRecord>> {
        (**self).headings(doc)
    }
}

/// Native headings read from the filesystem and parsed with tree-sitter.
pub struct NativeHeadings<F> {
    format: F,
}

impl<F: Format> NativeHeadings<F> {
    #[must_use]
    /// Creates a provider parsing documents as `format`.
    pub const fn new(format: F) -> Self {
        Self { format }
    }
}

impl<F: Format> HeadingProvider for NativeHeadings<F> {
    fn headings(&self, doc: &DocumentId) -> Option<Vec<HeadingRecord>> {
        let text = input::read_document(doc.as_path())
            .map_err(|e| tracing::warn!(%doc, error = %e, "could not read document"))
            .ok()?;
        native::extract_headings(&text, &self.format)
            .map_err(|e| tracing::warn!(%doc, error = %e, "could not extract native headings"))
            .ok()
    }
}

/// A provider whose lists also include cached callout headings.
pub struct MergedHeadings<'a, P> {
    inner: P,
    cache: &'a HeadingCache,
}

impl<'a, P> MergedHeadings<'a, P> {
    #[must_use]
    /// Layers `cache` over `inner`.
    pub const fn new(inner: P, cache: &'a HeadingCache) -> Self {
        Self { inner, cache }
    }
}

impl<P: HeadingProvider> HeadingProvider for MergedHeadings<'_, P> {
    fn headings(&self, doc: &DocumentId) -> Option<Vec<HeadingRecord>> {
        let real = self.inner.headings(doc)?;
        Some(self.cache.get(doc, real))
    }
}

#[cfg(test)]
#[path = "tests/provider.rs"]
mod tests;
