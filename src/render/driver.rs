//! Crossterm terminal backend.
//!
//! [`Driver`] writes frame updates to any `Write` sink (stdout in the binary, a
//! byte buffer in tests). [`TerminalGuard`] owns the terminal modes the page
//! needs and restores them when dropped.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use super::frame::CellUpdate;
use super::strip::{CellStyle, Tone};

/// Terminal color for a palette tone.
pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Text => Color::Rgb { r: 226, g: 232, b: 240 },
        Tone::Muted => Color::Rgb { r: 148, g: 163, b: 184 },
        Tone::Accent => Color::Rgb { r: 96, g: 165, b: 250 },
        Tone::AccentAlt => Color::Rgb { r: 192, g: 132, b: 252 },
        Tone::Danger => Color::Rgb { r: 248, g: 113, b: 113 },
        Tone::Success => Color::Rgb { r: 74, g: 222, b: 128 },
        Tone::Warning => Color::Rgb { r: 250, g: 204, b: 21 },
        Tone::Surface => Color::Rgb { r: 30, g: 41, b: 59 },
        Tone::Particle => Color::Rgb { r: 71, g: 85, b: 105 },
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Writes cell updates as crossterm commands.
pub struct Driver<W: Write = BufWriter<Stdout>> {
    writer: W,
}

impl Driver {
    /// A driver writing to buffered stdout.
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(io::stdout()))
    }

    /// Terminal size `(columns, rows)`.
    pub fn terminal_size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl<W: Write> Driver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Queue `updates`. Call [`flush`](Self::flush) to send them.
    pub fn apply_updates(&mut self, updates: &[CellUpdate]) -> io::Result<()> {
        for update in updates {
            // Printed by the wide glyph to its left.
            if update.cell.is_continuation() {
                continue;
            }
            queue!(self.writer, cursor::MoveTo(update.x, update.y))?;
            self.queue_style(&update.cell.style)?;
            queue!(
                self.writer,
                Print(update.cell.ch),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn queue_style(&mut self, style: &CellStyle) -> io::Result<()> {
        if let Some(fg) = style.fg {
            queue!(self.writer, SetForegroundColor(tone_color(fg)))?;
        }
        if let Some(bg) = style.bg {
            queue!(self.writer, SetBackgroundColor(tone_color(bg)))?;
        }
        let attributes = [
            (style.bold, Attribute::Bold),
            (style.dim, Attribute::Dim),
            (style.italic, Attribute::Italic),
            (style.underline, Attribute::Underlined),
            (style.reverse, Attribute::Reverse),
        ];
        for (on, attribute) in attributes {
            if on {
                queue!(self.writer, SetAttribute(attribute))?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TerminalGuard
// ---------------------------------------------------------------------------

/// Raw mode, alternate screen, mouse capture and bracketed paste, held for the
/// guard's lifetime.
#[derive(Debug)]
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // Constructed first so a failure below still restores raw mode.
        let guard = Self { active: true };
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            cursor::Hide
        )?;
        tracing::debug!("terminal entered alternate screen");
        Ok(guard)
    }

    /// Restore the terminal. Restoring twice is a no-op.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let screen = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            cursor::Show
        );
        let raw = terminal::disable_raw_mode();
        tracing::debug!("terminal restored");
        screen.and(raw)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(error = %err, "failed to restore terminal");
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
