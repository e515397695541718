use std::time::Duration;

use crossterm::event::{self, Event};
use kk_core::session::Outcome;
use ratatui::{backend::Backend, Terminal};

use crate::{app::App, ui};

/// Drives the prompt box until the user commits or abandons.
pub fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<Outcome> {
    loop {
        if app.dirty {
            let view: &App = app;
            terminal.draw(|f| ui::draw(f, view))?;
            app.dirty = false;
        }

        if event::poll(Duration::from_millis(120))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Paste(s) => app.on_paste(&s),
                Event::Resize(_, _) => app.dirty = true,
                _ => {}
            }
        }

        if let Some(outcome) = app.outcome.take() {
            return Ok(outcome);
        }
    }
}
