//! Snapshot rendering helpers.
//!
//! Functions for turning strips and frames into plain-text strings for
//! assertions.

use crate::render::{Frame, Strip};

/// Convert raw strips to a plain text string.
///
/// Builds a `width` x `height` grid of spaces, then overlays each strip's cells
/// at their (x, y) positions. Each row is right-trimmed and rows are joined
/// with `'\n'`.
pub fn strips_to_string(strips: &[Strip], width: i32, height: i32) -> String {
    if width <= 0 || height <= 0 {
        return String::new();
    }

    let mut grid: Vec<Vec<Option<char>>> = vec![vec![Some(' '); width as usize]; height as usize];
    for strip in strips {
        if strip.y < 0 || strip.y >= height {
            continue;
        }
        for (i, cell) in strip.cells.iter().enumerate() {
            let x = strip.x_offset + i as i32;
            if (0..width).contains(&x) {
                grid[strip.y as usize][x as usize] = (!cell.is_continuation()).then_some(cell.ch);
            }
        }
    }

    grid.into_iter()
        .map(|row| {
            row.into_iter()
                .flatten()
                .collect::<String>()
                .trim_end()
                .to_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A frame as plain text with trailing blank lines removed.
pub fn frame_to_string(frame: &Frame) -> String {
    frame.text().trim_end_matches('\n').to_owned()
}

/// Rows of `text` that contain `needle`, by index.
pub fn rows_containing(text: &str, needle: &str) -> Vec<usize> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| line.contains(needle).then_some(i))
        .collect()
}
