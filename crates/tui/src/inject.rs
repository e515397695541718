use std::io::{self, Write};

use kk_core::inject::InputInjector;
use tracing::warn;

/// Prints the command on stdout, one line, for the shell to pick up.
pub struct StdoutInjector;

impl InputInjector for StdoutInjector {
    fn type_text(&mut self, text: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{text}").and_then(|_| out.flush()) {
            warn!(target: "tui", "write command to stdout: {}", e);
        }
    }
}

/// Synthesized keystrokes into whatever window has focus.
#[cfg(feature = "keystrokes")]
pub struct EnigoInjector {
    enigo: enigo::Enigo,
}

#[cfg(feature = "keystrokes")]
impl EnigoInjector {
    pub fn new() -> anyhow::Result<Self> {
        let enigo = enigo::Enigo::new(&enigo::Settings::default())?;
        Ok(Self { enigo })
    }
}

#[cfg(feature = "keystrokes")]
impl InputInjector for EnigoInjector {
    fn type_text(&mut self, text: &str) {
        use enigo::Keyboard;
        if let Err(e) = self.enigo.text(text) {
            warn!(target: "tui", "keystroke injection failed: {}", e);
        }
    }
}

#[cfg(feature = "keystrokes")]
fn print_only() -> bool {
    std::env::var("KK_PRINT_ONLY").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Keystrokes when built with them and not disabled, stdout otherwise.
pub fn from_env() -> Box<dyn InputInjector> {
    #[cfg(feature = "keystrokes")]
    {
        if !print_only() {
            match EnigoInjector::new() {
                Ok(i) => return Box::new(i),
                Err(e) => warn!(target: "tui", "keystrokes unavailable, printing instead: {}", e),
            }
        }
    }
    Box::new(StdoutInjector)
}
