//! crossterm → shared vocabulary translation.
//!
//! The only place in this crate that matches on crossterm key codes. Everything
//! downstream speaks [`presentation_core::KeyCode`].
use crossterm::event::{
    KeyCode as TermKey, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode,
    MouseButton as TermButton, MouseEvent as TermMouse, MouseEventKind,
};
use presentation_core::{KeyCode, MouseButton, MouseEvent};

/// Translates a crossterm key into the shared vocabulary.
pub fn translate_key(key: &KeyEvent) -> KeyCode {
    match key.code {
        TermKey::Up => KeyCode::Up,
        TermKey::Down => KeyCode::Down,
        TermKey::Left => KeyCode::Left,
        TermKey::Right => KeyCode::Right,
        TermKey::Home => KeyCode::Home,
        TermKey::End => KeyCode::End,
        TermKey::PageUp => KeyCode::PageUp,
        TermKey::PageDown => KeyCode::PageDown,
        TermKey::Insert => KeyCode::Insert,
        TermKey::Delete => KeyCode::Delete,
        TermKey::Backspace => KeyCode::Backspace,
        TermKey::Tab | TermKey::BackTab => KeyCode::Tab,
        TermKey::Enter => KeyCode::Enter,
        TermKey::Esc => KeyCode::Escape,
        TermKey::F(n) => KeyCode::function(n),
        TermKey::Char(ch) => KeyCode::from_char(ch),
        TermKey::Modifier(modifier) => translate_modifier(modifier),
        TermKey::Null => KeyCode::None,
        _ => KeyCode::Unknown,
    }
}

fn translate_modifier(modifier: ModifierKeyCode) -> KeyCode {
    match modifier {
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => KeyCode::Shift,
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => KeyCode::Ctrl,
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => KeyCode::Alt,
        _ => KeyCode::Unknown,
    }
}

/// Only presses (and repeats) produce input; releases are ignored.
pub fn is_press(key: &KeyEvent) -> bool {
    matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
}

/// Ctrl+C. Raw mode swallows SIGINT, so the handler treats this as quit.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, TermKey::Char('c') | TermKey::Char('C'))
}

fn translate_button(button: TermButton) -> MouseButton {
    match button {
        TermButton::Left => MouseButton::Left,
        TermButton::Right => MouseButton::Right,
        TermButton::Middle => MouseButton::Middle,
    }
}

/// Translates a crossterm mouse event; horizontal scrolling is dropped.
pub fn translate_mouse(mouse: &TermMouse) -> Option<MouseEvent> {
    let (x, y) = (i32::from(mouse.column), i32::from(mouse.row));
    let event = match mouse.kind {
        MouseEventKind::Down(button) => MouseEvent::press(x, y, translate_button(button)),
        MouseEventKind::Up(button) => MouseEvent::release(x, y, translate_button(button)),
        MouseEventKind::Drag(button) => MouseEvent {
            button: translate_button(button),
            ..MouseEvent::moved(x, y)
        },
        MouseEventKind::Moved => MouseEvent::moved(x, y),
        MouseEventKind::ScrollUp => MouseEvent::wheel(x, y, 1),
        MouseEventKind::ScrollDown => MouseEvent::wheel(x, y, -1),
        MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(translate_key(&KeyEvent::from(TermKey::Char('k'))), KeyCode::K);
        assert_eq!(translate_key(&KeyEvent::from(TermKey::Char('K'))), KeyCode::K);
    }

    #[test]
    fn navigation_and_function_keys() {
        assert_eq!(translate_key(&KeyEvent::from(TermKey::Esc)), KeyCode::Escape);
        assert_eq!(translate_key(&KeyEvent::from(TermKey::PageDown)), KeyCode::PageDown);
        assert_eq!(translate_key(&KeyEvent::from(TermKey::F(5))), KeyCode::F5);
        assert_eq!(translate_key(&KeyEvent::from(TermKey::F(20))), KeyCode::Unknown);
        assert_eq!(translate_key(&KeyEvent::from(TermKey::CapsLock)), KeyCode::Unknown);
    }

    #[test]
    fn ctrl_c_is_an_interrupt() {
        assert!(is_interrupt(&KeyEvent::new(TermKey::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_interrupt(&KeyEvent::from(TermKey::Char('c'))));
    }

    #[test]
    fn mouse_scroll_and_buttons() {
        let down = TermMouse {
            kind: MouseEventKind::Down(TermButton::Right),
            column: 4,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        let event = translate_mouse(&down).unwrap();
        assert_eq!((event.x, event.y), (4, 2));
        assert_eq!(event.button, MouseButton::Right);
        assert!(event.pressed);

        let scroll = TermMouse {
            kind: MouseEventKind::ScrollDown,
            ..down
        };
        assert_eq!(translate_mouse(&scroll).unwrap().scroll, -1);

        let sideways = TermMouse {
            kind: MouseEventKind::ScrollLeft,
            ..down
        };
        assert!(translate_mouse(&sideways).is_none());
    }
}
