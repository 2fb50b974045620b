use super::{AppState, FileMode, View};
use crate::config::Config;
use crate::heading::{DocumentId, HeadingOrigin};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tempfile::{Builder, NamedTempFile};

const CHAT: &str = "# Intro\n\n> [!chat-r]\n> Question?\n\n## Next\n\n> [!chat-l]\n> Reply\n";

fn markdown_file(content: &str) -> NamedTempFile {
    let file = Builder::new().suffix(".md").tempfile().unwrap();
    fs::write(file.path(), content).unwrap();
    file
}

fn outline_summary(app: &AppState) -> Vec<(String, HeadingOrigin)> {
    app.outline
        .iter()
        .map(|h| (h.text.clone(), h.origin))
        .collect()
}

#[test]
fn test_single_file_opens_merged_outline() {
    let file = markdown_file(CHAT);
    let app = AppState::new(vec![file.path().to_path_buf()], &Config::default());

    assert_eq!(app.file_mode, FileMode::Single);
    assert_eq!(app.current_view, View::Outline);
    assert_eq!(
        outline_summary(&app),
        vec![
            ("Intro".to_string(), HeadingOrigin::Native),
            ("Question?".to_string(), HeadingOrigin::Callout),
            ("Next".to_string(), HeadingOrigin::Native),
            ("Reply".to_string(), HeadingOrigin::Callout),
        ]
    );
    assert_eq!(app.engine().cache().len(), 1);
}

#[test]
fn test_reload_picks_up_edits() {
    let file = markdown_file(CHAT);
    let mut app = AppState::new(vec![file.path().to_path_buf()], &Config::default());

    fs::write(file.path(), "# Intro\n\n> [!chat-r]\n> Changed my mind\n").unwrap();
    app.reload_active();

    assert_eq!(
        outline_summary(&app),
        vec![
            ("Intro".to_string(), HeadingOrigin::Native),
            ("Changed my mind".to_string(), HeadingOrigin::Callout),
        ]
    );
    let doc = DocumentId::from_path(file.path());
    assert_eq!(app.engine().cache().headings(&doc).map(<[_]>::len), Some(1));
}

#[test]
fn test_poll_detects_modification() {
    let file = markdown_file(CHAT);
    let mut app = AppState::new(vec![file.path().to_path_buf()], &Config::default());
    assert!(!app.poll_changes());

    fs::write(file.path(), "> [!chat-l]\n> Only this\n").unwrap();
    let handle = fs::OpenOptions::new()
        .write(true)
        .open(file.path())
        .unwrap();
    handle
        .set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();

    assert!(app.poll_changes());
    assert_eq!(
        outline_summary(&app),
        vec![("Only this".to_string(), HeadingOrigin::Callout)]
    );
}

#[test]
fn test_multi_file_navigation() {
    let first = markdown_file("# One\n\n> [!chat-r]\n> Hi one\n");
    let second = markdown_file("# Two\n");
    let files: Vec<PathBuf> = vec![first.path().to_path_buf(), second.path().to_path_buf()];
    let mut app = AppState::new(files, &Config::default());

    assert_eq!(app.file_mode, FileMode::Multi);
    assert_eq!(app.current_view, View::FileList);
    assert!(app.outline.is_empty());
    assert!(app.active_document().is_none());

    app.current_file_index = 0;
    app.open_selected_file();
    assert_eq!(app.current_view, View::Outline);
    assert_eq!(app.outline.len(), 2);

    app.close_active_file();
    assert_eq!(app.current_view, View::FileList);
    assert!(app.outline.is_empty());

    app.current_file_index = 1;
    app.open_selected_file();
    assert_eq!(
        outline_summary(&app),
        vec![("Two".to_string(), HeadingOrigin::Native)]
    );
    assert_eq!(app.engine().cache().len(), 2);
}

#[test]
fn test_callout_navigation() {
    let file = markdown_file(CHAT);
    let mut app = AppState::new(vec![file.path().to_path_buf()], &Config::default());

    assert_eq!(app.find_next_of(HeadingOrigin::Callout), Some(1));
    app.current_heading_index = 1;
    assert_eq!(app.find_next_of(HeadingOrigin::Callout), Some(3));
    assert_eq!(app.find_prev_of(HeadingOrigin::Native), Some(0));
    assert_eq!(app.find_prev_of(HeadingOrigin::Callout), None);
    assert_eq!(app.navigate_to_last(), Some(3));
    assert_eq!(app.find_prev_heading(), Some(0));
    assert_eq!(app.find_next_heading(), Some(2));
}

#[test]
fn test_preview_shows_callout_block() {
    let file = markdown_file(CHAT);
    let mut app = AppState::new(vec![file.path().to_path_buf()], &Config::default());

    app.current_heading_index = 1;
    app.enter_preview();

    assert_eq!(app.current_view, View::Preview);
    let rows: Vec<String> = app
        .editor_state
        .as_ref()
        .unwrap()
        .lines
        .iter_row()
        .map(|line| line.iter().collect::<String>())
        .collect();
    assert_eq!(rows, vec!["> [!chat-r]", "> Question?"]);

    app.exit_preview();
    assert_eq!(app.current_view, View::Outline);
    assert!(app.editor_state.is_none());
}

#[test]
fn test_unsupported_extension_shows_native_only() {
    let file = Builder::new().suffix(".txt").tempfile().unwrap();
    fs::write(file.path(), CHAT).unwrap();
    let app = AppState::new(vec![file.path().to_path_buf()], &Config::default());

    assert!(app.engine().cache().is_empty());
    assert_eq!(
        outline_summary(&app),
        vec![
            ("Intro".to_string(), HeadingOrigin::Native),
            ("Next".to_string(), HeadingOrigin::Native),
        ]
    );
}

#[test]
fn test_shutdown_empties_cache() {
    let file = markdown_file(CHAT);
    let mut app = AppState::new(vec![file.path().to_path_buf()], &Config::default());

    app.shutdown();

    assert!(app.engine().cache().is_empty());
    assert!(!app.engine().is_attached());
}
