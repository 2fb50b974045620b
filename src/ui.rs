//! The UI renders the viewer state into something visible and vim-able.
//!
//! The draw function dispatches on the current view. The outline view indents native headings
//! by level and marks callout headings with a speech glyph so the two sources stay distinct.

use crate::app_state::{AppState, FileMode, View};
use crate::config::Config;
use crate::heading::{HeadingOrigin, HeadingRecord};
use edtui::{EditorTheme, EditorView, SyntaxHighlighter};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const OUTLINE_HELP: &str =
    "↑/↓: Navigate | Tab/Shift+Tab: Next/Prev callout | Enter: Preview | r: Reload";

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &mut AppState, _cfg: &Config) {
    match app.current_view {
        View::FileList => draw_files(f, app),
        View::Outline => draw_outline(f, app),
        View::Preview => draw_preview(f, app),
    }
}

fn split_with_footer(f: &Frame) -> std::rc::Rc<[ratatui::layout::Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area())
}

fn draw_files(f: &mut Frame, app: &AppState) {
    let chunks = split_with_footer(f);

    let items: Vec<ListItem> = app
        .files
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let style = if i == app.current_file_index {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            let line = Line::from(Span::styled(
                format!("📄 {}", path.display()),
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ));
            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!("Files ({})", app.files.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, chunks[0]);

    let help = Paragraph::new("↑/↓: Navigate | Enter: Outline | q: Quit")
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[1]);
}

/// Styled outline row for one heading.
fn heading_line(heading: &HeadingRecord) -> Line<'static> {
    match heading.origin {
        HeadingOrigin::Native => {
            let indent = "  ".repeat(heading.level.saturating_sub(1));
            let marker = "#".repeat(heading.level);
            Line::from(vec![
                Span::raw(indent),
                Span::styled(format!("{marker} "), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    heading.text.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ])
        }
        HeadingOrigin::Callout => Line::from(vec![
            Span::styled("💬 ", Style::default().fg(Color::Yellow)),
            Span::styled(heading.text.clone(), Style::default().fg(Color::Yellow)),
        ]),
    }
}

fn draw_outline(f: &mut Frame, app: &AppState) {
    let chunks = split_with_footer(f);

    let items: Vec<ListItem> = app
        .outline
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let style = if i == app.current_heading_index {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(heading_line(heading)).style(style)
        })
        .collect();

    let name = app
        .active_document()
        .map_or_else(|| "Outline".to_string(), ToString::to_string);
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(name));
    f.render_widget(list, chunks[0]);

    let quit = match app.file_mode {
        FileMode::Multi => "q: Files",
        FileMode::Single => "q: Quit",
    };
    let help = match &app.message {
        Some(msg) => format!("{msg} | {OUTLINE_HELP} | {quit}"),
        None => format!("{OUTLINE_HELP} | {quit}"),
    };
    let help_widget = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    f.render_widget(help_widget, chunks[1]);
}

fn draw_preview(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Location
            Constraint::Min(0),    // Preview
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let Some(heading) = app.current_heading().cloned() else {
        return;
    };

    let location = format!(
        "{}:{}-{}",
        app.active_document()
            .map_or_else(String::new, ToString::to_string),
        heading.span.start.line + 1,
        heading.span.end.line + 1,
    );
    let location_widget =
        Paragraph::new(location).block(Block::default().borders(Borders::ALL).title("Location"));
    f.render_widget(location_widget, chunks[0]);

    let title = format!(
        "{} (max line: {} chars)",
        heading.text,
        app.get_max_line_width()
    );
    if let Some(ref mut editor_state) = app.editor_state {
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(chunks[1]);
        f.render_widget(block, chunks[1]);

        let syntax_highlighter = SyntaxHighlighter::new("dracula", "md");
        let editor = EditorView::new(editor_state)
            .theme(EditorTheme::default())
            .syntax_highlighter(Some(syntax_highlighter))
            .wrap(true);

        f.render_widget(editor, inner);
    }

    let help = Paragraph::new("Esc/q: Back to outline | h/j/k/l: Move cursor")
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
