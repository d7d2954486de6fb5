pub mod app;
pub mod palette;
pub mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::context::AppContext;
use crate::tui::app::{App, InputMode, View};

pub fn run(ctx: AppContext) -> Result<()> {
    // Build state before touching the terminal so load errors print normally
    let mut app = App::new(ctx)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.refresh();
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => {
                app.status = None;
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Tab => app.switch_view(),
                    KeyCode::Char('[') => app.previous_day(),
                    KeyCode::Char(']') => app.next_day(),
                    KeyCode::Char('t') => app.jump_today(),
                    KeyCode::Char('R') => app.request_reset(),
                    KeyCode::Char('T') => app.cycle_theme(),
                    KeyCode::Char('a') => app.enter_add_mode(),
                    code => match app.view {
                        View::Dashboard => match code {
                            KeyCode::Char('+') | KeyCode::Char('l') | KeyCode::Right => app.increment_selected(),
                            KeyCode::Char('-') | KeyCode::Char('h') | KeyCode::Left => app.decrement_selected(),
                            KeyCode::Enter | KeyCode::Char('s') => app.checkout(),
                            KeyCode::Char('c') => app.clear_cart(),
                            _ => {}
                        },
                        View::History => {
                            if matches!(code, KeyCode::Char('d') | KeyCode::Delete) {
                                app.request_delete();
                            }
                        }
                        View::Report => match code {
                            KeyCode::Left | KeyCode::Char('h') => app.stats.previous_scope(),
                            KeyCode::Right | KeyCode::Char('l') => app.stats.next_scope(),
                            _ => {}
                        },
                    },
                }
            }
            InputMode::ConfirmReset | InputMode::ConfirmDelete(_) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm(true),
                _ => app.confirm(false),
            },
            InputMode::AddingItem => match key.code {
                KeyCode::Enter => app.submit_item(),
                KeyCode::Esc => app.exit_input_mode(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                KeyCode::Left => app.move_cursor_left(),
                KeyCode::Right => app.move_cursor_right(),
                _ => {}
            },
        }
    }
}
