mod app;
mod ui;

use crate::index::ScanConfig;
use anyhow::Result;
use app::{App, Focus, Mode};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

pub fn run(path: PathBuf, initial_query: Option<String>, config: ScanConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.clear()?;

    // Scan runs in the background; the UI is up immediately
    let mut app = App::new(path, config);

    if let Some(query) = initial_query {
        app.set_initial_query(&query);
    }

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// What the loop should do after a key
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.poll_scan();

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only presses; Windows also reports releases
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(app, key) == Flow::Quit {
                    return Ok(());
                }
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Flow {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c'))
        | (KeyModifiers::CONTROL, KeyCode::Char('q')) => return Flow::Quit,
        _ => {}
    }

    match app.mode {
        Mode::Help => app.hide_help(),
        Mode::Browse => match key.code {
            KeyCode::Enter => app.confirm_browse(),
            KeyCode::Esc => app.cancel_browse(),
            KeyCode::Backspace => {
                app.browse_input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.browse_input.push(c);
            }
            _ => {}
        },
        Mode::Search => return handle_search_key(app, key),
    }

    Flow::Continue
}

fn handle_search_key(app: &mut App, key: KeyEvent) -> Flow {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('o')) => app.open_selected_folder(),
        (KeyModifiers::CONTROL, KeyCode::Char('l')) => app.explore_laterally(),
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => app.cycle_sort(),
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => app.reverse_sort(),
        (KeyModifiers::CONTROL, KeyCode::Char('b')) => app.start_browse(),
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => app.select_next(),
        (KeyModifiers::CONTROL, KeyCode::Char('p')) => app.select_prev(),
        (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
            KeyCode::Esc => {
                if app.query.is_empty() {
                    return Flow::Quit;
                }
                app.clear_query();
            }
            KeyCode::Enter => match app.focus {
                Focus::Parts => app.toggle_focus(),
                Focus::Files => app.open_selected(),
            },
            KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
            KeyCode::Down => app.select_next(),
            KeyCode::Up => app.select_prev(),
            KeyCode::PageDown => app.select_page_down(),
            KeyCode::PageUp => app.select_page_up(),
            KeyCode::Backspace => app.backspace(),
            KeyCode::F(1) => app.show_help(),
            KeyCode::F(5) => app.rescan(),
            KeyCode::Char(c) => app.push_char(c),
            _ => {}
        },
        _ => {}
    }

    Flow::Continue
}
