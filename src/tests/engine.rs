use super::{
    ChangeNotifier, DocumentSource, Engine, NotificationToken, Origin, Outcome, SkipReason,
    Trigger,
};
use crate::error::{Error, Result};
use crate::heading::{DocumentId, HeadingOrigin, HeadingRecord, Position, Span};
use crate::provider::HeadingProvider;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

#[derive(Clone, Default)]
struct MemorySource {
    texts: Rc<RefCell<HashMap<DocumentId, String>>>,
    reads: Rc<Cell<usize>>,
}

impl MemorySource {
    fn set(&self, doc: &DocumentId, text: &str) {
        self.texts.borrow_mut().insert(doc.clone(), text.to_string());
    }

    fn remove(&self, doc: &DocumentId) {
        self.texts.borrow_mut().remove(doc);
    }
}

impl DocumentSource for MemorySource {
    fn read_text(&self, doc: &DocumentId) -> Result<String> {
        self.reads.set(self.reads.get() + 1);
        self.texts.borrow().get(doc).cloned().ok_or_else(|| {
            Error::io(
                doc.as_path(),
                io::Error::new(io::ErrorKind::NotFound, "gone"),
            )
        })
    }
}

#[derive(Default)]
struct Recorder {
    seen: Vec<(DocumentId, NotificationToken)>,
}

impl ChangeNotifier for Recorder {
    fn headings_changed(&mut self, doc: &DocumentId, token: NotificationToken) {
        self.seen.push((doc.clone(), token));
    }
}

fn engine_with(source: &MemorySource) -> Engine<MemorySource> {
    Engine::new(source.clone(), vec!["md".to_string()])
}

fn changed(doc: &DocumentId) -> Trigger {
    Trigger::DocumentChanged {
        doc: doc.clone(),
        origin: Origin::Host,
    }
}

const CHAT: &str = "# Log\n\n> [!chat-r]\n> First question\n\n> [!chat-l]\n> Answer\n";

#[test]
fn test_triggers_ignored_before_start() {
    let source = MemorySource::default();
    let doc = DocumentId::new("log.md");
    source.set(&doc, CHAT);
    let mut engine = engine_with(&source);
    let mut recorder = Recorder::default();

    let outcome = engine.handle(&changed(&doc), &mut recorder);

    assert_eq!(outcome, Outcome::Skipped(SkipReason::Detached));
    assert_eq!(source.reads.get(), 0);
    assert!(engine.cache().is_empty());
}

#[test]
fn test_start_parses_active_document() {
    let source = MemorySource::default();
    let doc = DocumentId::new("log.md");
    source.set(&doc, CHAT);
    let mut engine = engine_with(&source);
    let mut recorder = Recorder::default();

    let outcome = engine.start(Some(&doc), &mut recorder);

    assert_eq!(outcome, Outcome::Refreshed { count: 2 });
    assert!(engine.is_attached());
    assert_eq!(recorder.seen.len(), 1);
    assert_eq!(recorder.seen[0].0, doc);
    assert_eq!(recorder.seen[0].1.sequence(), 1);
    assert_eq!(engine.cache().headings(&doc).map(<[_]>::len), Some(2));
}

#[test]
fn test_own_notification_echo_is_ignored() {
    let source = MemorySource::default();
    let doc = DocumentId::new("log.md");
    source.set(&doc, CHAT);
    let mut engine = engine_with(&source);
    let mut recorder = Recorder::default();
    engine.start(None, &mut recorder);

    engine.handle(&changed(&doc), &mut recorder);
    let (_, token) = recorder.seen[0].clone();
    let echo = Trigger::DocumentChanged {
        doc: doc.clone(),
        origin: Origin::Notification(token),
    };

    let outcome = engine.handle(&echo, &mut recorder);

    assert_eq!(outcome, Outcome::Skipped(SkipReason::OwnNotification));
    assert_eq!(recorder.seen.len(), 1);
    assert_eq!(source.reads.get(), 1);
}

#[test]
fn test_foreign_notification_is_handled() {
    let source = MemorySource::default();
    let doc = DocumentId::new("log.md");
    source.set(&doc, CHAT);

    let mut other = engine_with(&source);
    let mut other_recorder = Recorder::default();
    other.start(Some(&doc), &mut other_recorder);
    let (_, foreign) = other_recorder.seen[0].clone();

    let mut engine = engine_with(&source);
    let mut recorder = Recorder::default();
    engine.start(None, &mut recorder);

    let outcome = engine.handle(
        &Trigger::DocumentChanged {
            doc: doc.clone(),
            origin: Origin::Notification(foreign),
        },
        &mut recorder,
    );

    assert!(!engine.issued(foreign));
    assert_eq!(outcome, Outcome::Refreshed { count: 2 });
}

#[test]
fn test_read_failure_keeps_previous_entry() {
    let source = MemorySource::default();
    let doc = DocumentId::new("log.md");
    source.set(&doc, CHAT);
    let mut engine = engine_with(&source);
    let mut recorder = Recorder::default();
    engine.start(Some(&doc), &mut recorder);

    source.remove(&doc);
    let outcome = engine.handle(&changed(&doc), &mut recorder);

    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(recorder.seen.len(), 1);
    let cached = engine.cache().headings(&doc).unwrap_or_default();
    assert_eq!(cached.len(), 2);
    assert_eq!(cached[0].text, "First question");
}

#[test]
fn test_last_write_wins() {
    let source = MemorySource::default();
    let doc = DocumentId::new("log.md");
    source.set(&doc, CHAT);
    let mut engine = engine_with(&source);
    let mut recorder = Recorder::default();
    engine.start(Some(&doc), &mut recorder);

    source.set(&doc, "> [!chat-r]\n> Rewritten\n");
    let outcome = engine.handle(&changed(&doc), &mut recorder);

    assert_eq!(outcome, Outcome::Refreshed { count: 1 });
    let cached = engine.cache().headings(&doc).unwrap_or_default();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].text, "Rewritten");
    assert_eq!(recorder.seen[1].1.sequence(), 2);
}

#[test]
fn test_unsupported_document_is_not_read() {
    let source = MemorySource::default();
    let doc = DocumentId::new("image.png");
    source.set(&doc, "> [!chat-r]\n> nope\n");
    let mut engine = engine_with(&source);
    let mut recorder = Recorder::default();
    engine.start(None, &mut recorder);

    let outcome = engine.handle(&Trigger::ActiveDocumentChanged(Some(doc)), &mut recorder);

    assert_eq!(outcome, Outcome::Skipped(SkipReason::Unsupported));
    assert_eq!(source.reads.get(), 0);
    assert!(recorder.seen.is_empty());
}

#[test]
fn test_no_active_document() {
    let source = MemorySource::default();
    let mut engine = engine_with(&source);
    let mut recorder = Recorder::default();

    assert_eq!(
        engine.start(None, &mut recorder),
        Outcome::Skipped(SkipReason::NoActiveDocument)
    );
    assert_eq!(
        engine.handle(&Trigger::ActiveDocumentChanged(None), &mut recorder),
        Outcome::Skipped(SkipReason::NoActiveDocument)
    );
}

#[test]
fn test_shutdown_clears_and_detaches() {
    let source = MemorySource::default();
    let doc = DocumentId::new("log.md");
    source.set(&doc, CHAT);
    let mut engine = engine_with(&source);
    let mut recorder = Recorder::default();
    engine.start(Some(&doc), &mut recorder);

    engine.shutdown();

    assert!(!engine.is_attached());
    assert!(engine.cache().is_empty());
    assert_eq!(
        engine.handle(&changed(&doc), &mut recorder),
        Outcome::Skipped(SkipReason::Detached)
    );
}

#[test]
fn test_forget_drops_one_document() {
    let source = MemorySource::default();
    let a = DocumentId::new("a.md");
    let b = DocumentId::new("b.md");
    source.set(&a, CHAT);
    source.set(&b, CHAT);
    let mut engine = engine_with(&source);
    let mut recorder = Recorder::default();
    engine.start(Some(&a), &mut recorder);
    engine.handle(&changed(&b), &mut recorder);

    engine.forget(&a);

    assert!(engine.cache().headings(&a).is_none());
    assert!(engine.cache().headings(&b).is_some());
}

struct OneHeading;

impl HeadingProvider for OneHeading {
    fn headings(&self, _doc: &DocumentId) -> Option<Vec<HeadingRecord>> {
        Some(vec![HeadingRecord {
            text: "Log".to_string(),
            level: 1,
            span: Span {
                start: Position::new(0, 0, 0),
                end: Position::new(0, 5, 5),
            },
            origin: HeadingOrigin::Native,
        }])
    }
}

#[test]
fn test_provider_merges_engine_cache() {
    let source = MemorySource::default();
    let doc = DocumentId::new("log.md");
    source.set(&doc, CHAT);
    let mut engine = engine_with(&source);
    let mut recorder = Recorder::default();
    engine.start(Some(&doc), &mut recorder);

    let headings = engine.provider(OneHeading).headings(&doc).unwrap_or_default();

    let summary: Vec<(&str, HeadingOrigin)> = headings
        .iter()
        .map(|h| (h.text.as_str(), h.origin))
        .collect();
    assert_eq!(
        summary,
        [
            ("Log", HeadingOrigin::Native),
            ("First question", HeadingOrigin::Callout),
            ("Answer", HeadingOrigin::Callout),
        ]
    );
}
