use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use kk_core::{history::HistoryCursor, session::Outcome};
use tracing::{debug, info};

pub mod input;

use input::InputField;

pub struct App {
    pub input: InputField,
    pub history: HistoryCursor,
    pub outcome: Option<Outcome>,
    pub dirty: bool,
}

impl App {
    pub fn new(history: HistoryCursor) -> Self {
        Self {
            input: InputField::default(),
            history,
            outcome: None,
            dirty: true,
        }
    }

    /// Commits the field as typed, blank included.
    fn submit(&mut self) {
        let text = self.input.text();
        info!(target: "tui", "on_key: Enter => commit input_len={}", text.len());
        self.outcome = Some(Outcome::Commit(text.to_string()));
    }

    fn abandon(&mut self) {
        info!(target: "tui", "session abandoned");
        self.outcome = Some(Outcome::Abandon);
    }

    fn recall_older(&mut self) {
        if let Some(text) = self.history.older() {
            self.input.set_text(text);
        }
        debug!(target: "tui", "history position={}", self.history.position());
    }

    fn recall_newer(&mut self) {
        if let Some(text) = self.history.newer() {
            self.input.set_text(text);
        }
        debug!(target: "tui", "history position={}", self.history.position());
    }

    /// Pasted text lands on one line.
    pub fn on_paste(&mut self, s: &str) {
        let flat: String = s
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        self.input.insert_str(&flat);
        self.dirty = true;
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.abandon(),
            KeyCode::Char('c') if ctrl => self.abandon(),
            KeyCode::Enter => self.submit(),
            KeyCode::Up => self.recall_older(),
            KeyCode::Down => self.recall_newer(),
            KeyCode::Backspace => self.input.delete_left(),
            KeyCode::Delete => self.input.delete_right(),
            KeyCode::Left if ctrl => self.input.move_word_left(),
            KeyCode::Right if ctrl => self.input.move_word_right(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Char('a') if ctrl => self.input.move_home(),
            KeyCode::Char('e') if ctrl => self.input.move_end(),
            KeyCode::Char('w') if ctrl => self.input.delete_prev_word(),
            KeyCode::Char('u') if ctrl => self.input.kill_to_start(),
            KeyCode::Char('k') if ctrl => self.input.kill_to_end(),
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => return,
            KeyCode::Char(ch) => {
                let mut buf = [0u8; 4];
                self.input.insert_str(ch.encode_utf8(&mut buf));
            }
            _ => return,
        }
        self.dirty = true;
    }
}
