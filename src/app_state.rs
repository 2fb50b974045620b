//! The viewer state bridging the callout engine and the terminal outline.
//!
//! The viewer plays host to the engine. Opening a file is an active-document change, a manual
//! reload or a modification time bump on disk is a document change, and the engine's
//! "headings changed" notifications are relayed back as document-changed events the way an
//! editor's metadata bus would. The engine drops those echoes by their token, and the viewer
//! rebuilds the outline through the merging provider whenever its active document changes.

use crate::config::Config;
use crate::engine::{ChangeNotifier, Engine, NotificationToken, Origin, Outcome, Trigger};
use crate::formats::markdown::MarkdownFormat;
use crate::heading::{DocumentId, HeadingOrigin, HeadingRecord};
use crate::input::{self, FileSource};
use crate::provider::{HeadingProvider, NativeHeadings};
use edtui::{EditorState, Lines};
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

#[derive(PartialEq, Eq, Debug)]
/// Determines navigation scope and quit behavior based on project size.
pub enum FileMode {
    /// Single-file mode quits directly to shell.
    Single,
    /// Multi-file mode returns to file list before quitting.
    Multi,
}

#[derive(PartialEq, Eq, Debug)]
/// Determines which UI screen renders and how input is interpreted.
pub enum View {
    /// Displays available files for multi-file projects.
    FileList,
    /// Shows the merged outline of the active file.
    Outline,
    /// Shows the source text a heading covers.
    Preview,
}

#[derive(Default)]
/// Host side of the engine's notifications.
///
/// Records which documents changed and queues the echo a metadata bus would send back.
struct OutlineRelay {
    echoes: VecDeque<Trigger>,
    changed: Vec<DocumentId>,
}

impl ChangeNotifier for OutlineRelay {
    fn headings_changed(&mut self, doc: &DocumentId, token: NotificationToken) {
        self.changed.push(doc.clone());
        self.echoes.push_back(Trigger::DocumentChanged {
            doc: doc.clone(),
            origin: Origin::Notification(token),
        });
    }
}

/// Session state of the outline viewer.
pub struct AppState {
    /// Documents available in this session.
    pub files: Vec<PathBuf>,
    /// Selected file in the file list view.
    pub current_file_index: usize,
    /// Controls navigation behavior and file list visibility.
    pub file_mode: FileMode,
    /// Active UI screen determining input handling.
    pub current_view: View,
    /// Merged outline of the active file.
    pub outline: Vec<HeadingRecord>,
    /// Selected entry in the outline.
    pub current_heading_index: usize,
    /// Preview buffer when the preview view is active.
    pub editor_state: Option<EditorState>,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Maximum line width for text wrapping in the preview.
    pub wrap_width: usize,
    engine: Engine<FileSource>,
    relay: OutlineRelay,
    active: Option<DocumentId>,
    active_modified: Option<SystemTime>,
}

impl AppState {
    #[must_use]
    /// Starts the engine and opens the outline straight away for a single file.
    ///
    /// Multi-file sessions start on the file list with no active document.
    pub fn new(files: Vec<PathBuf>, cfg: &Config) -> Self {
        let file_mode = if files.len() == 1 {
            FileMode::Single
        } else {
            FileMode::Multi
        };

        let mut state = Self {
            files,
            current_file_index: 0,
            file_mode,
            current_view: View::FileList,
            outline: Vec::new(),
            current_heading_index: 0,
            editor_state: None,
            message: None,
            wrap_width: cfg.wrap_width,
            engine: Engine::new(FileSource, cfg.file_extensions.clone()),
            relay: OutlineRelay::default(),
            active: None,
            active_modified: None,
        };

        if state.file_mode == FileMode::Single {
            state.active = state.files.first().map(|path| DocumentId::from_path(path));
            state.current_view = View::Outline;
        }
        let active = state.active.clone();
        let outcome = state.engine.start(active.as_ref(), &mut state.relay);
        state.settle(outcome);
        state
    }

    #[must_use]
    /// The document whose outline is shown, if any.
    pub const fn active_document(&self) -> Option<&DocumentId> {
        self.active.as_ref()
    }

    #[must_use]
    /// The engine backing this session.
    pub const fn engine(&self) -> &Engine<FileSource> {
        &self.engine
    }

    /// Makes the file selected in the file list active and shows its outline.
    pub fn open_selected_file(&mut self) {
        let Some(path) = self.files.get(self.current_file_index) else {
            return;
        };
        let doc = DocumentId::from_path(path);
        self.active = Some(doc.clone());
        self.current_heading_index = 0;
        self.current_view = View::Outline;
        self.dispatch(Trigger::ActiveDocumentChanged(Some(doc)));
    }

    /// Leaves the outline for the file list, clearing the active document.
    pub fn close_active_file(&mut self) {
        self.active = None;
        self.active_modified = None;
        self.outline.clear();
        self.current_view = View::FileList;
        self.dispatch(Trigger::ActiveDocumentChanged(None));
    }

    /// Re-extracts the active document as if it had just been edited.
    pub fn reload_active(&mut self) {
        if let Some(doc) = self.active.clone() {
            self.dispatch(Trigger::DocumentChanged {
                doc,
                origin: Origin::Host,
            });
        }
    }

    /// Reloads the active document if its modification time moved since the last read.
    ///
    /// Returns whether a reload happened.
    pub fn poll_changes(&mut self) -> bool {
        let Some(doc) = &self.active else {
            return false;
        };
        let modified = fs::metadata(doc.as_path())
            .and_then(|meta| meta.modified())
            .ok();
        if modified.is_none() || modified == self.active_modified {
            return false;
        }
        tracing::debug!(%doc, "active document modified on disk");
        self.reload_active();
        true
    }

    /// Feeds a trigger to the engine and drains the echoes its notifications produce.
    pub fn dispatch(&mut self, trigger: Trigger) {
        let mut queue = VecDeque::from([trigger]);
        let mut last = None;
        while let Some(trigger) = queue.pop_front() {
            let outcome = self.engine.handle(&trigger, &mut self.relay);
            tracing::debug!(?trigger, ?outcome, "handled trigger");
            queue.extend(self.relay.echoes.drain(..));
            if last.is_none() || matches!(outcome, Outcome::Refreshed { .. } | Outcome::Failed) {
                last = Some(outcome);
            }
        }
        if let Some(outcome) = last {
            self.settle(outcome);
        }
    }

    fn settle(&mut self, outcome: Outcome) {
        self.relay.echoes.clear();
        let touched_active = self
            .active
            .as_ref()
            .is_some_and(|doc| self.relay.changed.contains(doc));
        self.relay.changed.clear();

        match outcome {
            Outcome::Failed => {
                self.message = Some("Could not read document".to_string());
            }
            Outcome::Refreshed { .. } if touched_active => {
                self.refresh_outline();
            }
            Outcome::Skipped(_) if self.active.is_some() && self.outline.is_empty() => {
                // unsupported extension: still show the native headings
                self.refresh_outline();
            }
            Outcome::Refreshed { .. } | Outcome::Skipped(_) => {}
        }
    }

    /// Rebuilds the outline of the active document through the merging provider.
    pub fn refresh_outline(&mut self) {
        let Some(doc) = &self.active else {
            self.outline.clear();
            return;
        };
        let provider = self.engine.provider(NativeHeadings::new(MarkdownFormat));
        self.outline = provider.headings(doc).unwrap_or_default();
        self.active_modified = fs::metadata(doc.as_path())
            .and_then(|meta| meta.modified())
            .ok();

        if self.current_heading_index >= self.outline.len() {
            self.current_heading_index = self.outline.len().saturating_sub(1);
        }
        let callouts = self
            .outline
            .iter()
            .filter(|heading| heading.origin == HeadingOrigin::Callout)
            .count();
        self.message = Some(format!(
            "{} headings ({callouts} from callouts)",
            self.outline.len()
        ));
    }

    #[must_use]
    /// The selected outline entry.
    pub fn current_heading(&self) -> Option<&HeadingRecord> {
        self.outline.get(self.current_heading_index)
    }

    /// Loads the text covered by the selected heading into the preview buffer.
    pub fn enter_preview(&mut self) {
        let (Some(doc), Some(heading)) = (&self.active, self.current_heading()) else {
            return;
        };
        match input::read_document(doc.as_path()) {
            Ok(text) => {
                let block = heading.span.slice(&text);
                let lines = Lines::from(block.trim_end_matches('\n'));
                self.editor_state = Some(EditorState::new(lines));
                self.current_view = View::Preview;
            }
            Err(e) => {
                tracing::warn!(%doc, error = %e, "could not open preview");
                self.message = Some(format!("Error reading: {e}"));
            }
        }
    }

    /// Returns from the preview to the outline.
    pub fn exit_preview(&mut self) {
        self.editor_state = None;
        self.current_view = View::Outline;
    }

    /// Detaches the engine at the end of the session.
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }

    #[must_use]
    /// Returns the following outline index for sequential navigation.
    pub fn find_next_heading(&self) -> Option<usize> {
        let next = self.current_heading_index + 1;
        (next < self.outline.len()).then_some(next)
    }

    #[must_use]
    /// Returns the preceding outline index for reverse navigation.
    pub fn find_prev_heading(&self) -> Option<usize> {
        self.current_heading_index.checked_sub(1)
    }

    #[must_use]
    /// Finds the next entry produced by the given extractor.
    pub fn find_next_of(&self, origin: HeadingOrigin) -> Option<usize> {
        ((self.current_heading_index + 1)..self.outline.len())
            .find(|&i| self.outline[i].origin == origin)
    }

    #[must_use]
    /// Finds the previous entry produced by the given extractor.
    pub fn find_prev_of(&self, origin: HeadingOrigin) -> Option<usize> {
        (0..self.current_heading_index)
            .rev()
            .find(|&i| self.outline[i].origin == origin)
    }

    #[must_use]
    /// Jumps to the last outline entry.
    pub fn navigate_to_last(&self) -> Option<usize> {
        self.outline.len().checked_sub(1)
    }

    #[must_use]
    /// Calculates indentation width based on heading level.
    pub fn get_indent(&self) -> usize {
        self.current_heading()
            .map_or(0, |heading| heading.level.saturating_sub(1) * 2)
    }

    #[must_use]
    /// Determines available width for text after accounting for indentation.
    pub fn get_max_line_width(&self) -> usize {
        self.wrap_width.saturating_sub(self.get_indent())
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
