//! Input event types.
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`MouseEvent`] and supporting types.
//! Positions are in the same coordinate space as widget bounds. Crossterm
//! events convert via `From`, so the dispatcher never sees crossterm types.

use std::ops::{BitAnd, BitOr};

use crate::geometry::{Offset, Size};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
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
    F(u8),
    /// A key with no mapping of its own.
    Other,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A key press with its modifiers.
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

// ---------------------------------------------------------------------------
// MouseBtn / MouseAction / MouseEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(MouseBtn),
    Up(MouseBtn),
    Drag(MouseBtn),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// A mouse event at a position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub position: Offset,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    pub fn new(kind: MouseAction, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: Offset::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The viewport changed size.
    Resize(Size),
    FocusGained,
    /// The window lost focus. Hover and press state are dropped.
    FocusLost,
    Paste(String),
}

impl InputEvent {
    pub fn key(code: Key) -> Self {
        InputEvent::Key(KeyEvent::plain(code))
    }

    pub fn mouse_move(x: f32, y: f32) -> Self {
        InputEvent::Mouse(MouseEvent::new(MouseAction::Moved, x, y))
    }

    pub fn mouse_down(x: f32, y: f32) -> Self {
        InputEvent::Mouse(MouseEvent::new(MouseAction::Down(MouseBtn::Left), x, y))
    }

    pub fn mouse_up(x: f32, y: f32) -> Self {
        InputEvent::Mouse(MouseEvent::new(MouseAction::Up(MouseBtn::Left), x, y))
    }
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;

    let mut out = Modifiers::NONE;
    if m.contains(KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::KeyCode;

        let code = match ct.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        };
        KeyEvent::new(code, convert_modifiers(ct.modifiers))
    }
}

fn convert_mouse_button(b: crossterm::event::MouseButton) -> MouseBtn {
    match b {
        crossterm::event::MouseButton::Left => MouseBtn::Left,
        crossterm::event::MouseButton::Right => MouseBtn::Right,
        crossterm::event::MouseButton::Middle => MouseBtn::Middle,
    }
}

/// Terminal cells map to one unit each.
impl From<crossterm::event::Event> for InputEvent {
    fn from(ct: crossterm::event::Event) -> Self {
        use crossterm::event::{Event, MouseEventKind};

        match ct {
            Event::Key(ke) => InputEvent::Key(KeyEvent::from(ke)),
            Event::Mouse(me) => {
                let kind = match me.kind {
                    MouseEventKind::Down(b) => MouseAction::Down(convert_mouse_button(b)),
                    MouseEventKind::Up(b) => MouseAction::Up(convert_mouse_button(b)),
                    MouseEventKind::Drag(b) => MouseAction::Drag(convert_mouse_button(b)),
                    MouseEventKind::Moved => MouseAction::Moved,
                    MouseEventKind::ScrollUp => MouseAction::ScrollUp,
                    // Horizontal scrolling has no counterpart.
                    _ => MouseAction::ScrollDown,
                };
                InputEvent::Mouse(MouseEvent {
                    kind,
                    position: Offset::new(f32::from(me.column), f32::from(me.row)),
                    modifiers: convert_modifiers(me.modifiers),
                })
            }
            Event::Resize(w, h) => InputEvent::Resize(Size::new(f32::from(w), f32::from(h))),
            Event::FocusGained => InputEvent::FocusGained,
            Event::FocusLost => InputEvent::FocusLost,
            Event::Paste(s) => InputEvent::Paste(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event as ct;

    #[test]
    fn modifiers() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert!(mods.contains(Modifiers::NONE));
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn key_from_crossterm() {
        let ke = KeyEvent::from(ct::KeyEvent::new(ct::KeyCode::Char('c'), ct::KeyModifiers::CONTROL));
        assert_eq!(ke, KeyEvent::new(Key::Char('c'), Modifiers::CTRL));

        let ke = KeyEvent::from(ct::KeyEvent::new(ct::KeyCode::BackTab, ct::KeyModifiers::SHIFT));
        assert_eq!(ke.code, Key::BackTab);
        assert!(ke.modifiers.contains(Modifiers::SHIFT));

        for (code, expected) in [
            (ct::KeyCode::Enter, Key::Enter),
            (ct::KeyCode::Esc, Key::Escape),
            (ct::KeyCode::Tab, Key::Tab),
            (ct::KeyCode::F(5), Key::F(5)),
            (ct::KeyCode::Insert, Key::Other),
        ] {
            let ke = KeyEvent::from(ct::KeyEvent::new(code, ct::KeyModifiers::NONE));
            assert_eq!(ke.code, expected);
        }
    }

    #[test]
    fn mouse_from_crossterm() {
        let input = InputEvent::from(ct::Event::Mouse(ct::MouseEvent {
            kind: ct::MouseEventKind::Down(ct::MouseButton::Left),
            column: 10,
            row: 5,
            modifiers: ct::KeyModifiers::NONE,
        }));
        assert_eq!(input, InputEvent::mouse_down(10.0, 5.0));

        let input = InputEvent::from(ct::Event::Mouse(ct::MouseEvent {
            kind: ct::MouseEventKind::Drag(ct::MouseButton::Right),
            column: 3,
            row: 7,
            modifiers: ct::KeyModifiers::CONTROL,
        }));
        match input {
            InputEvent::Mouse(me) => {
                assert_eq!(me.kind, MouseAction::Drag(MouseBtn::Right));
                assert_eq!(me.position, Offset::new(3.0, 7.0));
                assert!(me.modifiers.contains(Modifiers::CTRL));
            }
            other => panic!("expected mouse event, got {other:?}"),
        }
    }

    #[test]
    fn other_events_from_crossterm() {
        assert_eq!(
            InputEvent::from(ct::Event::Resize(120, 40)),
            InputEvent::Resize(Size::new(120.0, 40.0))
        );
        assert_eq!(InputEvent::from(ct::Event::FocusLost), InputEvent::FocusLost);
        assert_eq!(
            InputEvent::from(ct::Event::Paste("hi".into())),
            InputEvent::Paste("hi".into())
        );
    }
}
