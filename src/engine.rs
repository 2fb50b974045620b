//! Lifecycle wiring around the callout extractor and heading cache.
//!
//! The host feeds [`Trigger`]s in (a document changed, the active document changed) and the
//! engine re-reads that document, re-extracts its callouts, replaces the cache entry, and
//! tells the host through a [`ChangeNotifier`] that the headings changed.
//!
//! Hosts commonly turn "headings changed" straight back into "document changed". To stop that
//! echo from re-running extraction forever, every notification carries a
//! [`NotificationToken`] minted by the engine. A trigger whose origin carries one of this
//! engine's tokens is ignored.
//!
//! ```text
//! Trigger ─► supported? ─► read text ─► extract ─► cache.put ─► notify(token)
//!                │              │                                   │
//!                └─ Skipped     └─ Failed (cache untouched)         └─► echo ─► Skipped
//! ```

use crate::cache::HeadingCache;
use crate::callout;
use crate::error::Result;
use crate::heading::DocumentId;
use crate::provider::{HeadingProvider, MergedHeadings};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(1);

/// Supplies the current text of a document.
pub trait DocumentSource {
    /// Reads the full text of `doc`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is unavailable or disappeared mid-read.
    fn read_text(&self, doc: &DocumentId) -> Result<String>;
}

/// Receives "headings changed" notifications from the engine.
pub trait ChangeNotifier {
    /// Called once after the cache entry for `doc` has been replaced.
    ///
    /// Any trigger the host derives from this call should carry `token` as its origin.
    fn headings_changed(&mut self, doc: &DocumentId, token: NotificationToken);
}

#[derive(Clone, Copy, Debug, Default)]
/// Discards notifications, for hosts that read the cache on their own schedule.
pub struct Silent;

impl ChangeNotifier for Silent {
    fn headings_changed(&mut self, _doc: &DocumentId, _token: NotificationToken) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Marks a notification as emitted by a particular engine.
pub struct NotificationToken {
    engine: u64,
    sequence: u64,
}

impl NotificationToken {
    #[must_use]
    /// Position of this notification in its engine's emission order, starting at 1.
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where a document-changed trigger came from.
pub enum Origin {
    /// An edit or reload observed by the host.
    Host,
    /// The host relaying one of the engine's own notifications.
    Notification(NotificationToken),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// An event that may cause re-extraction.
pub enum Trigger {
    /// The content of a document changed.
    DocumentChanged {
        /// Document whose content changed.
        doc: DocumentId,
        /// Source of the event.
        origin: Origin,
    },
    /// The host switched to another document, or to none.
    ActiveDocumentChanged(Option<DocumentId>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Why a trigger did not lead to re-extraction.
pub enum SkipReason {
    /// The engine has not been started or has been shut down.
    Detached,
    /// The trigger echoed a notification this engine emitted.
    OwnNotification,
    /// The active document changed to nothing.
    NoActiveDocument,
    /// The document's kind is not one the engine handles.
    Unsupported,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Result of handling a trigger.
pub enum Outcome {
    /// The cache entry was replaced and a notification emitted.
    Refreshed {
        /// Number of callout headings now cached for the document.
        count: usize,
    },
    /// Nothing was done.
    Skipped(SkipReason),
    /// Reading the document failed; the previous cache entry is intact.
    Failed,
}

/// Keeps callout headings current for the documents a host shows.
pub struct Engine<S> {
    source: S,
    cache: HeadingCache,
    extensions: Vec<String>,
    id: u64,
    sequence: u64,
    attached: bool,
}

impl<S: DocumentSource> Engine<S> {
    #[must_use]
    /// Creates a detached engine reading from `source` and handling files with `extensions`.
    pub fn new(source: S, extensions: Vec<String>) -> Self {
        Self {
            source,
            cache: HeadingCache::new(),
            extensions,
            id: NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed),
            sequence: 0,
            attached: false,
        }
    }

    /// Attaches the engine to the host's events and parses the initially active document.
    pub fn start(
        &mut self,
        active: Option<&DocumentId>,
        notifier: &mut impl ChangeNotifier,
    ) -> Outcome {
        tracing::info!(engine = self.id, "starting callout engine");
        self.attached = true;
        match active {
            Some(doc) => self.refresh(doc, notifier),
            None => Outcome::Skipped(SkipReason::NoActiveDocument),
        }
    }

    /// Detaches from the host's events and forgets every cached document.
    pub fn shutdown(&mut self) {
        tracing::info!(
            engine = self.id,
            documents = self.cache.len(),
            "shutting down callout engine"
        );
        self.attached = false;
        self.cache.clear();
    }

    #[must_use]
    /// Whether triggers are currently being acted on.
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Reacts to a host event.
    pub fn handle(&mut self, trigger: &Trigger, notifier: &mut impl ChangeNotifier) -> Outcome {
        if !self.attached {
            tracing::debug!(?trigger, "ignoring trigger while detached");
            return Outcome::Skipped(SkipReason::Detached);
        }

        match trigger {
            Trigger::DocumentChanged { doc, origin } => {
                if let Origin::Notification(token) = origin {
                    if self.issued(*token) {
                        tracing::debug!(
                            %doc,
                            sequence = token.sequence,
                            "ignoring own notification"
                        );
                        return Outcome::Skipped(SkipReason::OwnNotification);
                    }
                }
                self.refresh(doc, notifier)
            }
            Trigger::ActiveDocumentChanged(Some(doc)) => self.refresh(doc, notifier),
            Trigger::ActiveDocumentChanged(None) => {
                Outcome::Skipped(SkipReason::NoActiveDocument)
            }
        }
    }

    /// Re-extracts `doc` and, on success, replaces its cache entry and notifies the host.
    ///
    /// A read failure is logged and leaves the cache exactly as it was.
    pub fn refresh(&mut self, doc: &DocumentId, notifier: &mut impl ChangeNotifier) -> Outcome {
        if !self.is_supported(doc) {
            tracing::debug!(%doc, "skipping unsupported document");
            return Outcome::Skipped(SkipReason::Unsupported);
        }

        let text = match self.source.read_text(doc) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%doc, error = %e, "could not read document, keeping callouts");
                return Outcome::Failed;
            }
        };

        let headings = callout::extract(&text);
        let count = headings.len();
        self.cache.put(doc.clone(), headings);

        let token = self.mint_token();
        tracing::debug!(%doc, count, sequence = token.sequence, "notifying headings changed");
        notifier.headings_changed(doc, token);

        Outcome::Refreshed { count }
    }

    /// Drops the cache entry for `doc`, e.g. when the host closes or deletes it.
    pub fn forget(&mut self, doc: &DocumentId) {
        self.cache.drop(doc);
    }

    #[must_use]
    /// Whether `doc` is a document kind the engine extracts callouts from.
    pub fn is_supported(&self, doc: &DocumentId) -> bool {
        doc.extension()
            .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted == ext))
    }

    #[must_use]
    /// Whether `token` was minted by this engine.
    pub const fn issued(&self, token: NotificationToken) -> bool {
        token.engine == self.id && token.sequence <= self.sequence
    }

    #[must_use]
    /// The callout headings cached so far.
    pub const fn cache(&self) -> &HeadingCache {
        &self.cache
    }

    #[must_use]
    /// Wraps a host heading provider so its lookups include this engine's callout headings.
    pub fn provider<P: HeadingProvider>(&self, inner: P) -> MergedHeadings<'_, P> {
        MergedHeadings::new(inner, &self.cache)
    }

    fn mint_token(&mut self) -> NotificationToken {
        self.sequence += 1;
        NotificationToken {
            engine: self.id,
            sequence: self.sequence,
        }
    }
}

#[cfg(test)]
#[path = "tests/engine.rs"]
mod tests;
