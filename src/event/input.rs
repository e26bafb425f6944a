//! Input events, decoupled from crossterm.
//!
//! Crossterm events are converted with [`from_crossterm`], which drops what
//! the page never reacts to (key releases, focus changes, mouse moves).

use std::ops::BitOr;

use crossterm::event as ct;

// ---------------------------------------------------------------------------
// Key / Modifiers
// ---------------------------------------------------------------------------

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The same set without SHIFT. Shifted characters arrive already cased.
    pub fn without_shift(self) -> Modifiers {
        Modifiers(self.0 & !Modifiers::SHIFT.0)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key press without modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }
}

/// Wheel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wheel {
    Up,
    Down,
}

/// Input the application loop handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Wheel(Wheel),
    Resize { width: u16, height: u16 },
    Paste(String),
}

// ---------------------------------------------------------------------------
// crossterm conversion
// ---------------------------------------------------------------------------

fn convert_modifiers(m: ct::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(ct::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(ct::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(ct::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

fn convert_key(code: ct::KeyCode) -> Option<Key> {
    let key = match code {
        ct::KeyCode::Char(c) => Key::Char(c),
        ct::KeyCode::Enter => Key::Enter,
        ct::KeyCode::Esc => Key::Escape,
        ct::KeyCode::Tab => Key::Tab,
        ct::KeyCode::Backspace => Key::Backspace,
        ct::KeyCode::Delete => Key::Delete,
        ct::KeyCode::Left => Key::Left,
        ct::KeyCode::Right => Key::Right,
        ct::KeyCode::Up => Key::Up,
        ct::KeyCode::Down => Key::Down,
        ct::KeyCode::Home => Key::Home,
        ct::KeyCode::End => Key::End,
        ct::KeyCode::PageUp => Key::PageUp,
        ct::KeyCode::PageDown => Key::PageDown,
        _ => return None,
    };
    Some(key)
}

/// Convert a crossterm event, or `None` if the page ignores it.
pub fn from_crossterm(event: ct::Event) -> Option<InputEvent> {
    match event {
        ct::Event::Key(ke) if ke.kind != ct::KeyEventKind::Release => {
            let code = convert_key(ke.code)?;
            Some(InputEvent::Key(KeyEvent::new(code, convert_modifiers(ke.modifiers))))
        }
        ct::Event::Mouse(me) => match me.kind {
            ct::MouseEventKind::ScrollUp => Some(InputEvent::Wheel(Wheel::Up)),
            ct::MouseEventKind::ScrollDown => Some(InputEvent::Wheel(Wheel::Down)),
            _ => None,
        },
        ct::Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        ct::Event::Paste(text) => Some(InputEvent::Paste(text)),
        _ => None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: ct::KeyCode, mods: ct::KeyModifiers) -> ct::Event {
        ct::Event::Key(ct::KeyEvent::new(code, mods))
    }

    fn mouse(kind: ct::MouseEventKind) -> ct::Event {
        ct::Event::Mouse(ct::MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: ct::KeyModifiers::NONE,
        })
    }

    #[test]
    fn modifiers_combine_and_strip_shift() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(!mods.contains(Modifiers::ALT));
        assert_eq!(mods.without_shift(), Modifiers::CTRL);
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn converts_char_with_ctrl() {
        let ev = from_crossterm(key(ct::KeyCode::Char('c'), ct::KeyModifiers::CONTROL));
        assert_eq!(
            ev,
            Some(InputEvent::Key(KeyEvent::new(Key::Char('c'), Modifiers::CTRL)))
        );
    }

    #[test]
    fn converts_alt_enter() {
        let ev = from_crossterm(key(ct::KeyCode::Enter, ct::KeyModifiers::ALT));
        assert_eq!(
            ev,
            Some(InputEvent::Key(KeyEvent::new(Key::Enter, Modifiers::ALT)))
        );
    }

    #[test]
    fn unsupported_keys_are_dropped() {
        assert_eq!(from_crossterm(key(ct::KeyCode::F(5), ct::KeyModifiers::NONE)), None);
        assert_eq!(from_crossterm(key(ct::KeyCode::Insert, ct::KeyModifiers::NONE)), None);
    }

    #[test]
    fn key_release_is_dropped() {
        let mut release = ct::KeyEvent::new(ct::KeyCode::Enter, ct::KeyModifiers::NONE);
        release.kind = ct::KeyEventKind::Release;
        assert_eq!(from_crossterm(ct::Event::Key(release)), None);
    }

    #[test]
    fn wheel_events() {
        assert_eq!(
            from_crossterm(mouse(ct::MouseEventKind::ScrollUp)),
            Some(InputEvent::Wheel(Wheel::Up))
        );
        assert_eq!(
            from_crossterm(mouse(ct::MouseEventKind::ScrollDown)),
            Some(InputEvent::Wheel(Wheel::Down))
        );
        assert_eq!(from_crossterm(mouse(ct::MouseEventKind::Moved)), None);
    }

    #[test]
    fn resize_and_paste() {
        assert_eq!(
            from_crossterm(ct::Event::Resize(80, 24)),
            Some(InputEvent::Resize { width: 80, height: 24 })
        );
        assert_eq!(
            from_crossterm(ct::Event::Paste("fever".into())),
            Some(InputEvent::Paste("fever".into()))
        );
        assert_eq!(from_crossterm(ct::Event::FocusLost), None);
    }
}
