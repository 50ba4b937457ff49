//! Terminal rendering and event loop for mediascope.
//!
//! Handles setup/teardown of raw mode, alternate screen, bracketed paste, redraws,
//! and events (keypress, paste, resize) to the session.

use crate::app::{KeypressResult, Session};
use crate::ui;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use std::{io, time::Duration};

/// Initializes the terminal in raw mode and alternate screen and runs the main event loop.
///
/// Blocks until quit. Handles all input and UI rendering.
///
/// Returns an std::io::Error if terminal setup or teardown fails.
pub fn run_terminal(session: &mut Session) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste, Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, session);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen,
        Show
    )?;
    result
}

/// Main event loop of mediascope: draws UI, polls for events and dispatches them to the session.
/// Returns on quit
fn event_loop<B: Backend>(terminal: &mut Terminal<B>, session: &mut Session) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    terminal.draw(|f| ui::render(f, session))?;

    loop {
        if session.tick() {
            terminal.draw(|f| ui::render(f, session))?;
        }

        // Event Polling
        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        match event::read()? {
            // handle keypress
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if session.handle_keypress(key) == KeypressResult::Quit {
                    break;
                }
            }

            // dropped files arrive as pasted paths
            Event::Paste(text) => session.handle_paste(&text),

            Event::Resize(_, _) => {}

            _ => continue,
        }
        // Redraw after state change
        terminal.draw(|f| ui::render(f, session))?;
    }
    Ok(())
}
