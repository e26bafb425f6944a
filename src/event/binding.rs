//! Key bindings.
//!
//! [`KeyBindingRegistry`] maps key + modifier combinations to
//! [`BindingAction`]s. Keys without a binding fall through to the text area.

use std::collections::HashMap;

use super::input::{Key, KeyEvent, Modifiers};

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingAction {
    Quit,
    /// Submit the symptom text.
    Submit,
    /// Insert a line break into the text area.
    Newline,
    /// Clear the result or error.
    Clear,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
}

/// `(Key, Modifiers) -> BindingAction`.
#[derive(Debug, Clone, Default)]
pub struct KeyBindingRegistry {
    bindings: HashMap<(Key, Modifiers), BindingAction>,
}

impl KeyBindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The page's bindings:
    ///
    /// | key | action |
    /// |---|---|
    /// | `Ctrl+C` | Quit |
    /// | `Enter` | Submit |
    /// | `Alt+Enter`, `Shift+Enter` | Newline |
    /// | `Esc` | Clear |
    /// | `Up` / `Down` | ScrollUp / ScrollDown |
    /// | `PageUp` / `PageDown` | PageUp / PageDown |
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind(Key::Char('c'), Modifiers::CTRL, BindingAction::Quit);
        registry.bind(Key::Enter, Modifiers::NONE, BindingAction::Submit);
        registry.bind(Key::Enter, Modifiers::ALT, BindingAction::Newline);
        registry.bind(Key::Enter, Modifiers::SHIFT, BindingAction::Newline);
        registry.bind(Key::Escape, Modifiers::NONE, BindingAction::Clear);
        registry.bind(Key::Up, Modifiers::NONE, BindingAction::ScrollUp);
        registry.bind(Key::Down, Modifiers::NONE, BindingAction::ScrollDown);
        registry.bind(Key::PageUp, Modifiers::NONE, BindingAction::PageUp);
        registry.bind(Key::PageDown, Modifiers::NONE, BindingAction::PageDown);
        registry
    }

    /// Register a binding, replacing any existing one for the same chord.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: BindingAction) {
        self.bindings.insert((key, modifiers), action);
    }

    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<BindingAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// Exact match on key and modifiers.
    pub fn resolve(&self, event: &KeyEvent) -> Option<BindingAction> {
        self.bindings.get(&(event.code, event.modifiers)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
