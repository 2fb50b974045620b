//! calloutline: browse markdown outlines with chat callouts folded in as headings.
#![allow(clippy::multiple_crate_versions)]

use calloutline::engine::Silent;
use calloutline::formats::markdown::MarkdownFormat;
use calloutline::heading::HeadingOrigin;
use calloutline::{app_state, config, input, ui};
use calloutline::{DocumentId, Engine, HeadingProvider, HeadingRecord, NativeHeadings};
use clap::Parser;
use edtui::EditorEventHandler;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calloutline")]
#[command(about = "Markdown outlines with chat callouts as headings", long_about = None)]
struct Args {
    /// Files or directories to outline
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// File extensions to match
    #[arg(long, short = 'e', value_name = "EXT")]
    ext: Vec<String>,

    /// Print merged outlines as JSON instead of starting the viewer
    #[arg(long)]
    json: bool,

    /// Write logs to this file (the viewer owns the terminal, so logs are off otherwise)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

#[derive(Serialize)]
struct DocumentOutline {
    document: DocumentId,
    headings: Vec<HeadingRecord>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_ref(), args.json)?;

    let mut cfg = config::Config::load();

    // Override config with command line args
    if !args.ext.is_empty() {
        cfg.file_extensions = args.ext;
    }

    let documents = input::find_documents(args.paths, &cfg.file_extensions)?;

    if documents.is_empty() {
        eprintln!("No matching files found");
        return Ok(());
    }

    if args.json {
        return print_outlines(documents, &cfg);
    }

    let state = app_state::AppState::new(documents, &cfg);
    run_tui(state, &cfg)
}

fn init_tracing(log: Option<&PathBuf>, json: bool) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

fn print_outlines(documents: Vec<PathBuf>, cfg: &config::Config) -> io::Result<()> {
    let mut engine = Engine::new(input::FileSource, cfg.file_extensions.clone());
    engine.start(None, &mut Silent);

    let mut outlines = Vec::new();
    for path in documents {
        let doc = DocumentId::from_path(&path);
        engine.refresh(&doc, &mut Silent);
        let provider = engine.provider(NativeHeadings::new(MarkdownFormat));
        if let Some(headings) = provider.headings(&doc) {
            let callouts = headings
                .iter()
                .filter(|heading| heading.origin == HeadingOrigin::Callout)
                .count();
            tracing::info!(%doc, total = headings.len(), callouts, "outlined document");
            outlines.push(DocumentOutline {
                document: doc,
                headings,
            });
        }
    }
    engine.shutdown();

    let json = serde_json::to_string_pretty(&outlines).map_err(io::Error::other)?;
    println!("{json}");
    Ok(())
}

fn run_tui(mut app: app_state::AppState, cfg: &config::Config) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut editor_handler = EditorEventHandler::default();

    let result = run_app(&mut terminal, &mut app, cfg, &mut editor_handler);
    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

const POLL_INTERVAL: Duration = Duration::from_millis(500);

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut app_state::AppState,
    cfg: &config::Config,
    editor_handler: &mut EditorEventHandler,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app, cfg))?;

        if !event::poll(POLL_INTERVAL)? {
            // Pick up edits made in another editor
            app.poll_changes();
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };

        match app.current_view {
            app_state::View::FileList => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Up => {
                    app.current_file_index = app.current_file_index.saturating_sub(1);
                }
                KeyCode::Down => {
                    if app.current_file_index + 1 < app.files.len() {
                        app.current_file_index += 1;
                    }
                }
                KeyCode::Enter => app.open_selected_file(),
                _ => {}
            },
            app_state::View::Outline => match key.code {
                KeyCode::Char('q') => {
                    if app.file_mode == app_state::FileMode::Multi {
                        app.close_active_file();
                    } else {
                        return Ok(());
                    }
                }
                KeyCode::Char('r') => app.reload_active(),
                KeyCode::Up | KeyCode::Char('k') => {
                    if let Some(prev) = app.find_prev_heading() {
                        app.current_heading_index = prev;
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if let Some(next) = app.find_next_heading() {
                        app.current_heading_index = next;
                    }
                }
                KeyCode::Tab => {
                    if let Some(next) = app.find_next_of(HeadingOrigin::Callout) {
                        app.current_heading_index = next;
                    }
                }
                KeyCode::BackTab => {
                    if let Some(prev) = app.find_prev_of(HeadingOrigin::Callout) {
                        app.current_heading_index = prev;
                    }
                }
                KeyCode::Home => app.current_heading_index = 0,
                KeyCode::End => {
                    if let Some(last) = app.navigate_to_last() {
                        app.current_heading_index = last;
                    }
                }
                KeyCode::Enter => app.enter_preview(),
                _ => {}
            },
            app_state::View::Preview => {
                let normal = app
                    .editor_state
                    .as_ref()
                    .is_some_and(|state| state.mode == edtui::EditorMode::Normal);
                let leave = matches!(key.code, KeyCode::Esc)
                    || (matches!(key.code, KeyCode::Char('q'))
                        && !key.modifiers.contains(KeyModifiers::CONTROL));
                if normal && leave {
                    app.exit_preview();
                } else if let Some(ref mut editor_state) = app.editor_state {
                    editor_handler.on_key_event(key, editor_state);
                }
            }
        }
    }
}
