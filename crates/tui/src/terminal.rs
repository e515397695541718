use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    cursor::SetCursorStyle,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{backend::CrosstermBackend, Terminal, TerminalOptions, Viewport};

/// The field and its footer.
const VIEWPORT_ROWS: u16 = 2;

/// Raw mode and an inline viewport drawn under the shell prompt, so the
/// scrollback stays visible while the box is open.
///
/// Call `restore` before injecting keystrokes so they land in the shell and
/// not in the box. Dropping without it still puts the terminal back.
pub struct TerminalGuard {
    pub terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        let opts = TerminalOptions {
            viewport: Viewport::Inline(VIEWPORT_ROWS),
        };
        let terminal = execute!(out, EnableBracketedPaste, SetCursorStyle::SteadyBar)
            .and_then(|_| Terminal::with_options(CrosstermBackend::new(out), opts));
        match terminal {
            Ok(terminal) => Ok(Self {
                terminal,
                restored: false,
            }),
            Err(e) => {
                let _ = execute!(io::stdout(), DisableBracketedPaste, SetCursorStyle::DefaultUserShape);
                let _ = disable_raw_mode();
                Err(e.into())
            }
        }
    }

    /// Wipes the box and hands the terminal back, reporting the first failure.
    pub fn restore(mut self) -> Result<()> {
        self.restored = true;
        self.reset()?;
        Ok(())
    }

    // Every step runs even if an earlier one fails.
    fn reset(&mut self) -> io::Result<()> {
        let cleared = self.terminal.clear();
        let modes = execute!(
            self.terminal.backend_mut(),
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
        let cursor = self.terminal.show_cursor();
        let raw = disable_raw_mode();
        cleared.and(modes).and(cursor).and(raw)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if !self.restored {
            let _ = self.reset();
        }
    }
}
