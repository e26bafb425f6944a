//! Screen buffer and frame diffing.
//!
//! A `Frame` is a full grid of `StyledCell`s. Each render cycle builds a new
//! frame from strips, then `diff` against the previous frame yields only the
//! `CellUpdate`s the driver has to write.

use crate::geometry::Rect;

use super::strip::{Strip, StyledCell};

/// One changed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    pub x: u16,
    pub y: u16,
    pub cell: StyledCell,
}

/// A `width x height` grid of cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    cells: Vec<StyledCell>,
}

impl Frame {
    /// A blank frame.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![StyledCell::BLANK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn area(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&StyledCell> {
        self.index(x as i32, y as i32).map(|i| &self.cells[i])
    }

    /// Write one cell; out-of-bounds writes are dropped.
    ///
    /// Overwriting either half of a double-width glyph blanks the other half.
    pub fn put(&mut self, x: i32, y: i32, cell: StyledCell) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if self.cells[i].is_continuation() && !cell.is_continuation() {
            if let Some(lead) = self.index(x - 1, y) {
                self.cells[lead].ch = ' ';
            }
        }
        if self.cells[i].columns() > 1 {
            if let Some(next) = self.index(x + 1, y) {
                if self.cells[next].is_continuation() {
                    self.cells[next].ch = ' ';
                }
            }
        }
        self.cells[i] = cell;
    }

    /// Write `strips`, shifted up by `scroll_rows`, clipped to `clip`.
    pub fn place(&mut self, strips: &[Strip], scroll_rows: i32, clip: Rect) {
        let clip = clip.intersection(self.area());
        if clip.area() == 0 {
            return;
        }
        for strip in strips {
            let y = strip.y - scroll_rows;
            if y < clip.y || y >= clip.bottom() {
                continue;
            }
            let visible = strip.crop(clip.x, clip.right());
            for (i, cell) in visible.cells.iter().enumerate() {
                self.put(visible.x_offset + i as i32, y, *cell);
            }
        }
    }

    /// Cells that differ from `previous`. A size change repaints everything.
    ///
    /// A changed continuation cell also reports the glyph it belongs to, so
    /// the driver can redraw both columns at once.
    pub fn diff(&self, previous: &Frame) -> Vec<CellUpdate> {
        let same_size = self.width == previous.width && self.height == previous.height;
        let width = self.width as usize;
        let mut updates: Vec<CellUpdate> = Vec::new();
        for (i, cell) in self.cells.iter().enumerate() {
            if same_size && previous.cells[i] == *cell {
                continue;
            }
            let (x, y) = ((i % width) as u16, (i / width) as u16);
            if cell.is_continuation() && x > 0 {
                let lead_reported = updates
                    .last()
                    .is_some_and(|last| (last.x, last.y) == (x - 1, y));
                if !lead_reported {
                    updates.push(CellUpdate {
                        x: x - 1,
                        y,
                        cell: self.cells[i - 1],
                    });
                }
            }
            updates.push(CellUpdate { x, y, cell: *cell });
        }
        updates
    }

    /// Row `y` as plain text, trailing blanks trimmed.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = y as usize * self.width as usize;
        let row: String = self.cells[start..start + self.width as usize]
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect();
        row.trim_end().to_owned()
    }

    /// Every row as plain text, joined with newlines.
    pub fn text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ===========================================================================
// Tests
// ===========================================================================
