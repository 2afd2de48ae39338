//! Minimal multi-line text buffer for the composer.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Up,
    Down,
    Forward,
    Back,
    Head,
    End,
}

/// Line storage with a (row, col) cursor in char units.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
        }
    }
}

impl TextBuffer {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// True when the buffer holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Inserts text at the cursor, splitting on `\n`.
    pub fn insert_str(&mut self, text: &str) {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.split_line();
            }
            if part.is_empty() {
                continue;
            }
            let line = &mut self.lines[self.cursor_row];
            let byte_idx = char_to_byte_index(line, self.cursor_col);
            line.insert_str(byte_idx, part);
            self.cursor_col += part.chars().count();
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    pub fn insert_newline(&mut self) {
        self.split_line();
    }

    fn split_line(&mut self) {
        let line = &mut self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        let rest = line.split_off(byte_idx);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
    }

    /// Backspace semantics.
    pub fn delete_prev_char(&mut self) {
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            let start = char_to_byte_index(line, self.cursor_col - 1);
            let end = char_to_byte_index(line, self.cursor_col);
            line.replace_range(start..end, "");
            self.cursor_col -= 1;
            return;
        }
        if self.cursor_row == 0 {
            return;
        }
        let current = self.lines.remove(self.cursor_row);
        self.cursor_row -= 1;
        self.cursor_col = line_char_len(&self.lines[self.cursor_row]);
        self.lines[self.cursor_row].push_str(&current);
    }

    /// Delete-key semantics.
    pub fn delete_next_char(&mut self) {
        let row = self.cursor_row;
        if self.cursor_col >= line_char_len(&self.lines[row]) {
            if row + 1 < self.lines.len() {
                let next = self.lines.remove(row + 1);
                self.lines[row].push_str(&next);
            }
            return;
        }
        let line = &mut self.lines[row];
        let start = char_to_byte_index(line, self.cursor_col);
        let end = char_to_byte_index(line, self.cursor_col + 1);
        line.replace_range(start..end, "");
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        match movement {
            CursorMove::Up => {
                if self.cursor_row > 0 {
                    self.cursor_row -= 1;
                    self.clamp_col();
                }
            }
            CursorMove::Down => {
                if self.cursor_row + 1 < self.lines.len() {
                    self.cursor_row += 1;
                    self.clamp_col();
                }
            }
            CursorMove::Forward => {
                if self.cursor_col < line_char_len(&self.lines[self.cursor_row]) {
                    self.cursor_col += 1;
                } else if self.cursor_row + 1 < self.lines.len() {
                    self.cursor_row += 1;
                    self.cursor_col = 0;
                }
            }
            CursorMove::Back => {
                if self.cursor_col > 0 {
                    self.cursor_col -= 1;
                } else if self.cursor_row > 0 {
                    self.cursor_row -= 1;
                    self.cursor_col = line_char_len(&self.lines[self.cursor_row]);
                }
            }
            CursorMove::Head => self.cursor_col = 0,
            CursorMove::End => self.cursor_col = line_char_len(&self.lines[self.cursor_row]),
        }
    }

    fn clamp_col(&mut self) {
        self.cursor_col = self
            .cursor_col
            .min(line_char_len(&self.lines[self.cursor_row]));
    }

    /// Applies an editing key. Enter is left to the caller.
    pub fn input(&mut self, key: KeyEvent) {
        if matches!(key.kind, KeyEventKind::Release) {
            return;
        }

        match key.code {
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(ch);
            }
            KeyCode::Backspace => self.delete_prev_char(),
            KeyCode::Delete => self.delete_next_char(),
            KeyCode::Left => self.move_cursor(CursorMove::Back),
            KeyCode::Right => self.move_cursor(CursorMove::Forward),
            KeyCode::Up => self.move_cursor(CursorMove::Up),
            KeyCode::Down => self.move_cursor(CursorMove::Down),
            KeyCode::Home => self.move_cursor(CursorMove::Head),
            KeyCode::End => self.move_cursor(CursorMove::End),
            _ => {}
        }
    }
}

fn line_char_len(line: &str) -> usize {
    line.chars().count()
}

fn char_to_byte_index(line: &str, char_idx: usize) -> usize {
    line.char_indices()
        .nth(char_idx)
        .map_or(line.len(), |(idx, _)| idx)
}
