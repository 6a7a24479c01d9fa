//! Key binding registry.
//!
//! [`KeyBindingRegistry`] maps key+modifier combinations to [`BindingAction`]s.
//! `with_defaults()` installs focus traversal and activation.

use std::collections::HashMap;

use super::input::{Key, KeyEvent, Modifiers};

/// What a bound key does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingAction {
    /// Move focus to the next focusable widget.
    FocusNext,
    /// Move focus to the previous focusable widget.
    FocusPrevious,
    /// Press the focused button or toggle the focused check box.
    Activate,
    /// Drop focus.
    Unfocus,
    /// A named action, reported as a widget event on the focused widget.
    Custom(String),
}

/// Registry of key bindings, mapping (Key, Modifiers) -> BindingAction.
#[derive(Debug, Clone)]
pub struct KeyBindingRegistry {
    bindings: HashMap<(Key, Modifiers), BindingAction>,
}

impl KeyBindingRegistry {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// A registry with the standard bindings:
    ///
    /// - `Tab` -> FocusNext
    /// - `BackTab`, `Shift+BackTab`, `Shift+Tab` -> FocusPrevious
    /// - `Enter`, `Space` -> Activate
    /// - `Escape` -> Unfocus
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind(Key::Tab, Modifiers::NONE, BindingAction::FocusNext);
        registry.bind(Key::Tab, Modifiers::SHIFT, BindingAction::FocusPrevious);
        // Terminals report Shift+Tab as BackTab, with or without SHIFT set.
        registry.bind(Key::BackTab, Modifiers::NONE, BindingAction::FocusPrevious);
        registry.bind(Key::BackTab, Modifiers::SHIFT, BindingAction::FocusPrevious);
        registry.bind(Key::Enter, Modifiers::NONE, BindingAction::Activate);
        registry.bind(Key::Char(' '), Modifiers::NONE, BindingAction::Activate);
        registry.bind(Key::Escape, Modifiers::NONE, BindingAction::Unfocus);
        registry
    }

    /// Register a binding, replacing any existing one for the same keys.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: BindingAction) {
        self.bindings.insert((key, modifiers), action);
    }

    /// Remove a binding, returning its action.
    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<BindingAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// Look up the action for a key event (exact modifier match).
    pub fn resolve(&self, event: &KeyEvent) -> Option<&BindingAction> {
        self.bindings.get(&(event.code, event.modifiers))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyBindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
