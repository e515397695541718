// Centralized UI strings and labels.

use kk_core::history::{CursorState, HistoryCursor};

pub const LABEL: &str = "Write CLI command for: ";
pub const PLACEHOLDER: &str = "Press up/down to navigate history";
pub const ESC_HINT: &str = "Esc to close";

// Widest the input field ever gets, in columns.
pub const FIELD_MAX_WIDTH: u16 = 80;

// Footer line: close hint plus the recall position while browsing.
pub fn footer_line(cursor: &HistoryCursor) -> String {
    match cursor.state() {
        CursorState::Fresh => ESC_HINT.to_string(),
        CursorState::Browsing(i) => format!("{}  |  history {}/{}", ESC_HINT, i + 1, cursor.len()),
    }
}
