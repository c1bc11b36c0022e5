//! Script editor: a line buffer with a character-indexed cursor.
//!
//! Cue comments often carry non-ASCII text (names, dashes, umlauts), so the
//! cursor column counts chars, not bytes.

#[derive(Debug, Clone)]
pub struct Editor {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    scroll_offset: usize,
    viewport_height: usize,
    revision: u64,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of char index `col` in `s` (clamped to the end).
fn byte_at(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map_or(s.len(), |(i, _)| i)
}

fn split_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        vec![String::new()]
    } else {
        content.lines().map(str::to_string).collect()
    }
}

impl Editor {
    pub fn new(content: &str) -> Self {
        Self {
            lines: split_lines(content),
            cursor_row: 0,
            cursor_col: 0,
            scroll_offset: 0,
            viewport_height: 20,
            revision: 0,
        }
    }

    /// Get the full text content.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Get cursor position (row, char column).
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// Bumped on every change to the text; cursor moves don't count.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// First visible line.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn set_viewport_height(&mut self, h: usize) {
        self.viewport_height = h.max(1);
        self.ensure_cursor_visible();
    }

    fn ensure_cursor_visible(&mut self) {
        if self.cursor_row < self.scroll_offset {
            self.scroll_offset = self.cursor_row;
        } else if self.cursor_row >= self.scroll_offset + self.viewport_height {
            self.scroll_offset = self.cursor_row + 1 - self.viewport_height;
        }
    }

    fn current_len(&self) -> usize {
        char_len(&self.lines[self.cursor_row])
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn insert_char(&mut self, c: char) {
        let col = self.cursor_col.min(self.current_len());
        let line = &mut self.lines[self.cursor_row];
        let at = byte_at(line, col);
        line.insert(at, c);
        self.cursor_col = col + 1;
        self.touch();
    }

    /// Split the line at the cursor.
    pub fn newline(&mut self) {
        let col = self.cursor_col.min(self.current_len());
        let line = &mut self.lines[self.cursor_row];
        let at = byte_at(line, col);
        let rest = line.split_off(at);
        self.cursor_row += 1;
        self.lines.insert(self.cursor_row, rest);
        self.cursor_col = 0;
        self.ensure_cursor_visible();
        self.touch();
    }

    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let col = self.cursor_col.min(self.current_len());
            let line = &mut self.lines[self.cursor_row];
            let at = byte_at(line, col - 1);
            line.remove(at);
            self.cursor_col = col - 1;
            self.touch();
        } else if self.cursor_row > 0 {
            let current = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.current_len();
            self.lines[self.cursor_row].push_str(&current);
            self.ensure_cursor_visible();
            self.touch();
        }
    }

    /// Delete the character at the cursor, joining the next line at end of line.
    pub fn delete(&mut self) {
        if self.cursor_col < self.current_len() {
            let line = &mut self.lines[self.cursor_row];
            let at = byte_at(line, self.cursor_col);
            line.remove(at);
            self.touch();
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
            self.touch();
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col = self.cursor_col.min(self.current_len()) - 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.current_len();
            self.ensure_cursor_visible();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.current_len() {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
            self.ensure_cursor_visible();
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.cursor_col.min(self.current_len());
            self.ensure_cursor_visible();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = self.cursor_col.min(self.current_len());
            self.ensure_cursor_visible();
        }
    }

    pub fn home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn end(&mut self) {
        self.cursor_col = self.current_len();
    }

    /// Text on the cursor line to the left of the cursor.
    pub fn before_cursor(&self) -> &str {
        let line = &self.lines[self.cursor_row];
        &line[..byte_at(line, self.cursor_col)]
    }
}
