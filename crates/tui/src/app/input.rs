use unicode_segmentation::UnicodeSegmentation;

/// Single-line text field. `cursor` counts graphemes, not bytes.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    text: String,
    cursor: usize,
}

impl InputField {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Replace the contents and park the cursor at the end.
    pub fn set_text(&mut self, s: &str) {
        self.text = s.to_string();
        self.cursor = self.len();
    }

    // Byte offset of grapheme `idx`, or the end of the string.
    fn byte_at(&self, idx: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_at(self.cursor);
        self.text.insert_str(at, s);
        self.cursor += s.graphemes(true).count();
        self.cursor = self.cursor.min(self.len());
    }

    pub fn delete_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.byte_at(self.cursor - 1);
        let end = self.byte_at(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    pub fn delete_right(&mut self) {
        if self.cursor >= self.len() {
            return;
        }
        let start = self.byte_at(self.cursor);
        let end = self.byte_at(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    fn prev_word_start(&self) -> usize {
        let parts: Vec<&str> = self.text.graphemes(true).collect();
        let mut i = self.cursor.min(parts.len());
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        i
    }

    fn next_word_end(&self) -> usize {
        let parts: Vec<&str> = self.text.graphemes(true).collect();
        let mut i = self.cursor.min(parts.len());
        while i < parts.len() && parts[i].trim().is_empty() {
            i += 1;
        }
        while i < parts.len() && !parts[i].trim().is_empty() {
            i += 1;
        }
        i
    }

    pub fn move_word_left(&mut self) {
        self.cursor = self.prev_word_start();
    }

    pub fn move_word_right(&mut self) {
        self.cursor = self.next_word_end();
    }

    /// Ctrl-W.
    pub fn delete_prev_word(&mut self) {
        let start = self.prev_word_start();
        let (a, b) = (self.byte_at(start), self.byte_at(self.cursor));
        self.text.replace_range(a..b, "");
        self.cursor = start;
    }

    /// Ctrl-U.
    pub fn kill_to_start(&mut self) {
        let end = self.byte_at(self.cursor);
        self.text.replace_range(..end, "");
        self.cursor = 0;
    }

    /// Ctrl-K.
    pub fn kill_to_end(&mut self) {
        let start = self.byte_at(self.cursor);
        self.text.truncate(start);
    }

    /// Text before the cursor, used for cursor placement.
    pub fn before_cursor(&self) -> &str {
        &self.text[..self.byte_at(self.cursor)]
    }
}
