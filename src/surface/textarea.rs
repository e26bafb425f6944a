//! Multi-line symptom text area.
//!
//! Holds the value and a byte-offset cursor. Rendering hard-wraps the value to
//! the available width and keeps the cursor row inside the visible rows.

use crate::render::strip::{CellStyle, Strip, Tone};

use super::text::char_width;

/// Placeholder shown while the value is empty.
pub const PLACEHOLDER: &str = "Example: I have been experiencing persistent headaches for the past 3 days, along with nausea and sensitivity to bright light...";

/// Visible rows.
pub const TEXTAREA_ROWS: usize = 6;

/// A wrapped row of the value, with where the cursor sits in it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    text: String,
    cursor_col: Option<usize>,
}

/// Editable multi-line text.
#[derive(Debug, Clone)]
pub struct TextArea {
    value: String,
    placeholder: String,
    cursor: usize,
    rows: usize,
}

impl TextArea {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            placeholder: PLACEHOLDER.to_owned(),
            cursor: 0,
            rows: TEXTAREA_ROWS,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows.max(1);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Replace the value; the cursor moves to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Cursor as a byte offset into the value.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Insert `text`, normalizing `\r\n` and `\r` to `\n`.
    pub fn insert_str(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.value.insert_str(self.cursor, &normalized);
        self.cursor += normalized.len();
    }

    pub fn newline(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.prev_boundary();
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    /// Delete the character after the cursor.
    pub fn delete(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        let next = self.next_boundary();
        self.value.drain(self.cursor..next);
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.next_boundary();
        }
    }

    /// Move to the start of the current line.
    pub fn move_home(&mut self) {
        self.cursor = self.value[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
    }

    /// Move to the end of the current line.
    pub fn move_end(&mut self) {
        self.cursor = self.value[self.cursor..]
            .find('\n')
            .map_or(self.value.len(), |i| self.cursor + i);
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.value[self.cursor..]
            .chars()
            .next()
            .map_or(self.value.len(), |ch| self.cursor + ch.len_utf8())
    }

    /// Hard-wrap the value to `width` columns, tracking the cursor.
    fn wrap(&self, width: usize) -> Vec<Row> {
        let width = width.max(1);
        let mut rows = vec![Row { text: String::new(), cursor_col: None }];
        let mut col = 0;
        for (idx, ch) in self.value.char_indices() {
            let w = char_width(ch);
            if ch != '\n' && col + w > width {
                rows.push(Row { text: String::new(), cursor_col: None });
                col = 0;
            }
            let Some(row) = rows.last_mut() else {
                break;
            };
            if idx == self.cursor {
                row.cursor_col = Some(col);
            }
            if ch == '\n' {
                rows.push(Row { text: String::new(), cursor_col: None });
                col = 0;
                continue;
            }
            row.text.push(ch);
            col += w;
        }
        if self.cursor >= self.value.len() {
            if col >= width {
                rows.push(Row { text: String::new(), cursor_col: Some(0) });
            } else if let Some(row) = rows.last_mut() {
                row.cursor_col = Some(col);
            }
        }
        rows
    }

    /// Render `rows()` rows at `(x, y)`, `width` columns wide.
    ///
    /// `focused` draws the cursor; `dim` renders everything dimmed.
    pub fn render(&self, x: i32, y: i32, width: i32, focused: bool, dim: bool) -> Vec<Strip> {
        if width <= 0 {
            return Vec::new();
        }
        let field = CellStyle::fg(Tone::Text).with_bg(Tone::Surface);
        let lines: Vec<Row> = if self.value.is_empty() {
            let mut rows: Vec<Row> = super::text::wrap(&self.placeholder, width as usize)
                .into_iter()
                .map(|text| Row { text, cursor_col: None })
                .collect();
            if rows.is_empty() {
                rows.push(Row { text: String::new(), cursor_col: None });
            }
            rows[0].cursor_col = Some(0);
            rows
        } else {
            self.wrap(width as usize)
        };

        // Scroll so the cursor row stays visible.
        let cursor_row = lines.iter().position(|r| r.cursor_col.is_some()).unwrap_or(0);
        let first = (cursor_row + 1).saturating_sub(self.rows);
        let text_style = if self.value.is_empty() {
            CellStyle::fg(Tone::Muted).with_bg(Tone::Surface).italic()
        } else {
            field
        };

        (0..self.rows)
            .map(|i| {
                let mut strip = Strip::new(y + i as i32, x);
                if let Some(row) = lines.get(first + i) {
                    strip.push_str(&row.text, text_style);
                    strip.fill(width, field);
                    if let (true, Some(col)) = (focused, row.cursor_col) {
                        if let Some(cell) = strip.cells.get_mut(col.min(width as usize - 1)) {
                            cell.style = cell.style.reverse();
                        }
                    }
                } else {
                    strip.fill(width, field);
                }
                if dim {
                    strip.dim();
                }
                strip
            })
            .collect()
    }
}

impl Default for TextArea {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
