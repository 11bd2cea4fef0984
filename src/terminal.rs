//! Full-screen terminal implementation of the prompter.

use std::io;

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{DefaultTerminal, Terminal};
use tracing::{debug, warn};

use crate::error::RulesError;
use crate::modal_ui::{draw_confirm, draw_picker, draw_viewer};
use crate::modals::{
    ConfirmState, ModalAction, PickerState, ViewerState, handle_confirm_input, handle_picker_input,
    handle_viewer_input,
};
use crate::prompt::{Confirmation, Menu, Prompter};

/// Shows menus and confirmations as modals on the alternate screen.
///
/// The terminal is only taken over when the first modal is shown, so commands
/// that never prompt leave the screen alone. Dropping the prompter restores it.
#[derive(Default)]
pub struct TerminalPrompter {
    terminal: Option<DefaultTerminal>,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    fn terminal(&mut self) -> Result<&mut DefaultTerminal, RulesError> {
        if self.terminal.is_none() {
            enable_raw_mode()?;
            let terminal = setup_or_undo(
                || {
                    let mut stdout = io::stdout();
                    execute!(stdout, EnterAlternateScreen)?;
                    Terminal::new(ratatui::backend::CrosstermBackend::new(stdout))
                },
                || {
                    let _ = execute!(io::stdout(), LeaveAlternateScreen);
                    let _ = disable_raw_mode();
                },
            )?;
            debug!("terminal_acquired");
            self.terminal = Some(terminal);
        }
        // Populated above.
        self.terminal
            .as_mut()
            .ok_or_else(|| RulesError::Terminal(io::Error::other("terminal unavailable")))
    }

    /// Give the screen back, if it was taken.
    pub fn restore(&mut self) {
        if let Some(mut terminal) = self.terminal.take() {
            let _ = terminal.show_cursor();
            if let Err(e) = disable_raw_mode() {
                warn!(error = %e, "disable_raw_mode_failed");
            }
            if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
                warn!(error = %e, "leave_alternate_screen_failed");
            }
            debug!("terminal_restored");
        }
    }

    /// Scrollable read-only view of `text` until the user closes it.
    pub fn show_document(&mut self, title: &str, text: &str) -> Result<(), RulesError> {
        let mut state = ViewerState::new(title, text);
        let terminal = self.terminal()?;
        loop {
            terminal.draw(|f| draw_viewer(f, &mut state))?;
            if let Some(key) = next_key()?
                && let ModalAction::Close(()) = handle_viewer_input(&mut state, key.code, key.modifiers)
            {
                return Ok(());
            }
        }
    }
}

/// Run the screen setup after raw mode is on; on failure run `undo` so the shell is usable again.
fn setup_or_undo<T>(
    setup: impl FnOnce() -> io::Result<T>,
    undo: impl FnOnce(),
) -> Result<T, RulesError> {
    setup().map_err(|e| {
        warn!(error = %e, "terminal_setup_failed");
        undo();
        RulesError::from(e)
    })
}

/// Block until the next key press. Returns `None` for other events so the caller redraws.
fn next_key() -> Result<Option<KeyEvent>, RulesError> {
    match crossterm::event::read()? {
        // Windows reports both press and release.
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

impl Prompter for TerminalPrompter {
    fn pick(&mut self, menu: &Menu) -> Result<Option<usize>, RulesError> {
        let mut state = PickerState::new(menu);
        let terminal = self.terminal()?;
        loop {
            terminal.draw(|f| draw_picker(f, &mut state))?;
            if let Some(key) = next_key()?
                && let ModalAction::Close(choice) =
                    handle_picker_input(&mut state, key.code, key.modifiers)
            {
                debug!(title = %menu.title, choice = ?choice, "menu_closed");
                return Ok(choice);
            }
        }
    }

    fn confirm(&mut self, request: &Confirmation) -> Result<bool, RulesError> {
        let mut state = ConfirmState::new(request);
        let terminal = self.terminal()?;
        loop {
            terminal.draw(|f| draw_confirm(f, &state))?;
            if let Some(key) = next_key()?
                && let ModalAction::Close(answer) =
                    handle_confirm_input(&mut state, key.code, key.modifiers)
            {
                debug!(title = %request.title, answer, "confirm_closed");
                return Ok(answer);
            }
        }
    }
}

impl Drop for TerminalPrompter {
    fn drop(&mut self) {
        self.restore();
    }
}
