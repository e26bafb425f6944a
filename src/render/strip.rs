//! Strip: one row of styled terminal cells.
//!
//! The page renders every region into `Strip`s in page coordinates; the frame
//! places them on screen after subtracting the scroll offset.
//!
//! One cell is one terminal column. A double-width glyph occupies its cell
//! plus a trailing [`StyledCell::is_continuation`] cell; zero-width characters
//! are dropped.

use unicode_width::UnicodeWidthChar;

// ---------------------------------------------------------------------------
// Tone
// ---------------------------------------------------------------------------

/// Palette entries. The driver maps each to a terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Text,
    Muted,
    Accent,
    AccentAlt,
    Danger,
    Success,
    Warning,
    Surface,
    Particle,
}

// ---------------------------------------------------------------------------
// CellStyle
// ---------------------------------------------------------------------------

/// Visual style of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<Tone>,
    pub bg: Option<Tone>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl CellStyle {
    pub const PLAIN: CellStyle = CellStyle {
        fg: None,
        bg: None,
        bold: false,
        dim: false,
        italic: false,
        underline: false,
        reverse: false,
    };

    /// Plain style with a foreground tone.
    pub const fn fg(tone: Tone) -> Self {
        CellStyle {
            fg: Some(tone),
            ..CellStyle::PLAIN
        }
    }

    pub const fn with_bg(mut self, tone: Tone) -> Self {
        self.bg = Some(tone);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub const fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// The same style, dimmed.
    pub const fn dimmed(mut self) -> Self {
        self.dim = true;
        self
    }
}

// ---------------------------------------------------------------------------
// StyledCell
// ---------------------------------------------------------------------------

/// Placeholder char of the second column of a double-width glyph.
const CONTINUATION: char = '\0';

/// One character with its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledCell {
    pub ch: char,
    pub style: CellStyle,
}

impl StyledCell {
    pub const BLANK: StyledCell = StyledCell {
        ch: ' ',
        style: CellStyle::PLAIN,
    };

    pub fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }

    /// The second column of a double-width glyph.
    pub fn continuation(style: CellStyle) -> Self {
        Self {
            ch: CONTINUATION,
            style,
        }
    }

    pub fn is_continuation(&self) -> bool {
        self.ch == CONTINUATION
    }

    /// Terminal columns this cell's glyph covers: 2 for a wide lead, else 1.
    pub fn columns(&self) -> usize {
        if self.is_continuation() {
            0
        } else {
            self.ch.width().unwrap_or(0).max(1)
        }
    }
}

impl Default for StyledCell {
    fn default() -> Self {
        Self::BLANK
    }
}

// ---------------------------------------------------------------------------
// Strip
// ---------------------------------------------------------------------------

/// A horizontal run of cells starting at `(x_offset, y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    pub y: i32,
    pub x_offset: i32,
    pub cells: Vec<StyledCell>,
}

impl Strip {
    pub fn new(y: i32, x_offset: i32) -> Self {
        Self {
            y,
            x_offset,
            cells: Vec::new(),
        }
    }

    /// A strip holding `text` in one style.
    pub fn text(y: i32, x_offset: i32, text: &str, style: CellStyle) -> Self {
        let mut strip = Self::new(y, x_offset);
        strip.push_str(text, style);
        strip
    }

    pub fn push(&mut self, ch: char, style: CellStyle) {
        match ch.width() {
            Some(0) | None => {}
            Some(1) => self.cells.push(StyledCell::new(ch, style)),
            Some(_) => {
                self.cells.push(StyledCell::new(ch, style));
                self.cells.push(StyledCell::continuation(style));
            }
        }
    }

    pub fn push_str(&mut self, text: &str, style: CellStyle) {
        for ch in text.chars() {
            self.push(ch, style);
        }
    }

    pub fn width(&self) -> i32 {
        self.cells.len() as i32
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x_offset + self.width()
    }

    /// Keep only cells whose absolute column lies in `[x_start, x_end)`.
    ///
    /// A wide glyph cut in half by either edge becomes a blank.
    pub fn crop(&self, x_start: i32, x_end: i32) -> Strip {
        let mut result = Strip::new(self.y, x_start);
        for (i, cell) in self.cells.iter().enumerate() {
            let x = self.x_offset + i as i32;
            if x >= x_start && x < x_end {
                if result.cells.is_empty() {
                    result.x_offset = x;
                }
                result.cells.push(*cell);
            }
        }
        if let Some(first) = result.cells.first_mut() {
            if first.is_continuation() {
                first.ch = ' ';
            }
        }
        result.split_trailing_wide();
        result
    }

    /// Pad with blanks in `style`, or truncate, to exactly `width` cells.
    pub fn fill(&mut self, width: i32, style: CellStyle) {
        let w = width.max(0) as usize;
        self.cells.resize(w, StyledCell::new(' ', style));
        self.split_trailing_wide();
    }

    fn split_trailing_wide(&mut self) {
        if let Some(last) = self.cells.last_mut() {
            if last.columns() > 1 {
                last.ch = ' ';
            }
        }
    }

    /// Dim every cell.
    pub fn dim(&mut self) {
        for cell in &mut self.cells {
            cell.style.dim = true;
        }
    }

    /// The characters as a string.
    pub fn to_text(&self) -> String {
        self.cells
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
