//! The decoded key-event type returned by [`super::Terminal::read_key`]
//! (§4.1 contract).

use crossterm::event::{KeyCode, KeyEvent as CKeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Grapheme(char),
    Arrow(Direction),
    Home,
    End,
    Delete,
    Backspace,
    Tab,
    Enter,
    Esc,
    /// Ctrl-<letter>, letter lowercased.
    Ctrl(char),
    Alt(char),
    /// Resize/mouse events surface here so the main loop can trigger a
    /// redraw without the editor having to know about them (§4.1: "ignored
    /// by the core").
    Resize,
    Ignored,
}

pub fn from_crossterm(key: CKeyEvent) -> KeyEvent {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char(c) = key.code {
            return KeyEvent::Ctrl(c.to_ascii_lowercase());
        }
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        if let KeyCode::Char(c) = key.code {
            return KeyEvent::Alt(c);
        }
    }
    match key.code {
        KeyCode::Char(c) => KeyEvent::Grapheme(c),
        KeyCode::Left => KeyEvent::Arrow(Direction::Left),
        KeyCode::Right => KeyEvent::Arrow(Direction::Right),
        KeyCode::Up => KeyEvent::Arrow(Direction::Up),
        KeyCode::Down => KeyEvent::Arrow(Direction::Down),
        KeyCode::Home => KeyEvent::Home,
        KeyCode::End => KeyEvent::End,
        KeyCode::Delete => KeyEvent::Delete,
        KeyCode::Backspace => KeyEvent::Backspace,
        KeyCode::Tab => KeyEvent::Tab,
        KeyCode::Enter => KeyEvent::Enter,
        KeyCode::Esc => KeyEvent::Esc,
        _ => KeyEvent::Ignored,
    }
}
