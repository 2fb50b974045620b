//! calloutline: chat callouts as outline headings.
//!
//! Markdown notes often record conversations as `> [!chat-r]` / `> [!chat-l]` callouts. This
//! crate turns each such callout into a synthetic heading and interleaves those headings with
//! the document's own headings in document order, so an outline shows both.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod cache;
pub mod callout;
pub mod config;
pub mod engine;
pub mod error;
pub mod formats;
pub mod heading;
pub mod input;
pub mod line_index;
pub mod native;
pub mod provider;
pub mod ui;

pub use cache::HeadingCache;
pub use engine::{
    ChangeNotifier, DocumentSource, Engine, NotificationToken, Origin, Outcome, Trigger,
};
pub use error::{Error, Result};
pub use heading::{DocumentId, HeadingOrigin, HeadingRecord, Position, Span};
pub use provider::{HeadingProvider, MergedHeadings, NativeHeadings};
