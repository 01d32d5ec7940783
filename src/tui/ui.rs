use crate::index::FileRecord;
use crate::output::group_thousands;
use crate::query::{FileSort, Scope};
use crate::tui::app::{App, Focus, Mode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(5),    // Parts / Files
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_query_input(f, app, chunks[0]);
    draw_main_area(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if app.mode == Mode::Help {
        draw_help(f, f.area());
    }
}

fn draw_query_input(f: &mut Frame, app: &App, area: Rect) {
    let (text, title, color) = match app.mode {
        Mode::Browse => (
            app.browse_input.as_str(),
            " Directory (Enter: scan, Esc: cancel) ",
            Color::Green,
        ),
        _ => (
            app.query.as_str(),
            " Part (space: contains, F1: help, Esc: clear/quit) ",
            Color::Yellow,
        ),
    };

    let input = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(input, area);

    if app.mode != Mode::Help {
        let cursor = text.chars().count() as u16;
        f.set_cursor_position((area.x + cursor + 1, area.y + 1));
    }
}

fn draw_main_area(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    draw_parts_list(f, app, chunks[0]);
    draw_files_table(f, app, chunks[1]);
}

/// First row to render so that `selected` stays inside a window of `height`.
fn window_start(selected: usize, height: usize) -> usize {
    if height == 0 || selected < height {
        0
    } else {
        selected + 1 - height
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_parts_list(f: &mut Frame, app: &App, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let start = window_start(app.part_selected, height);

    let items: Vec<ListItem> = app
        .parts
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, part)| {
            let style = if i == app.part_selected {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(part.as_str())).style(style)
        })
        .collect();

    let title = match app.scope() {
        Scope::Global => format!(" Parts ({}) ", group_thousands(app.parts.len() as u64)),
        Scope::Lateral(lateral) => format!(
            " Parts of {} ({}) ",
            lateral.origin(),
            group_thousands(app.parts.len() as u64)
        ),
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(app.focus == Focus::Parts))
            .title(title),
    );

    f.render_widget(list, area);
}

fn column_title(label: &str, column: FileSort, app: &App) -> String {
    if app.sort == column {
        format!("{}{}", label, if app.descending { "▼" } else { "▲" })
    } else {
        label.to_string()
    }
}

fn draw_files_table(f: &mut Frame, app: &App, area: Rect) {
    let height = area.height.saturating_sub(3) as usize;
    let start = window_start(app.file_selected, height);

    let rows: Vec<Row> = app
        .file_records()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, record)| file_row(record, i == app.file_selected && app.focus == Focus::Files))
        .collect();

    let header = Row::new(vec![
        column_title("Name", FileSort::Path, app),
        column_title("Type", FileSort::Type, app),
        column_title("Size", FileSort::Size, app),
    ])
    .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    let title = match app.selected_part() {
        Some(part) => format!(" Files with '{}' ({}) ", part, group_thousands(app.files.len() as u64)),
        None => " Files ".to_string(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(15),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(app.focus == Focus::Files))
            .title(title),
    );

    f.render_widget(table, area);
}

fn file_row(record: &FileRecord, selected: bool) -> Row<'_> {
    let style = if selected {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Row::new(vec![
        Line::from(Span::styled(
            record.relative_path.as_str(),
            Style::default().fg(Color::Blue),
        )),
        Line::from(record.extension.as_str()),
        Line::from(group_thousands(record.size_bytes)).right_aligned(),
    ])
    .style(style)
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.scan_elapsed_secs() {
        Some(secs) => format!("{} ({:.1}s)", app.status_message, secs),
        None => app.status_message.clone(),
    };
    let status = Paragraph::new(text).style(Style::default().fg(Color::Cyan));

    f.render_widget(status, area);
}

const HELP_LINES: &[(&str, &str)] = &[
    ("text", "parts starting with text"),
    ("␠text", "parts containing text (leading space)"),
    (">text", "parts of the explored file starting with text"),
    ("Tab", "switch between parts and files"),
    ("↑ ↓ PgUp PgDn", "move selection"),
    ("Enter", "open file (or move to files)"),
    ("Ctrl+O", "open containing folder"),
    ("Ctrl+L", "explore laterally from selected file"),
    ("Ctrl+S / Ctrl+R", "cycle sort column / reverse order"),
    ("Ctrl+B", "choose another directory"),
    ("F5", "rescan directory"),
    ("Esc", "clear query, quit when empty"),
    ("Ctrl+C / Ctrl+Q", "quit"),
];

fn draw_help(f: &mut Frame, area: Rect) {
    let width = area.width.min(64);
    let height = area.height.min(HELP_LINES.len() as u16 + 2);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{:<18}", keys), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();

    let help = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Help (any key to close) "))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(help, popup);
}
