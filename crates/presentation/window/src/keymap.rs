//! minifb → shared key vocabulary, and shared vocabulary → egui keys.
//!
//! Nothing else in this crate matches on `minifb::Key`.
use minifb::{Key, MouseButton as NativeButton};
use presentation_core::{KeyCode, MouseButton};

pub fn translate_key(key: Key) -> KeyCode {
    match key {
        Key::Up => KeyCode::Up,
        Key::Down => KeyCode::Down,
        Key::Left => KeyCode::Left,
        Key::Right => KeyCode::Right,
        Key::Home => KeyCode::Home,
        Key::End => KeyCode::End,
        Key::PageUp => KeyCode::PageUp,
        Key::PageDown => KeyCode::PageDown,
        Key::Insert => KeyCode::Insert,
        Key::Delete => KeyCode::Delete,
        Key::Backspace => KeyCode::Backspace,
        Key::Tab => KeyCode::Tab,
        Key::Enter | Key::NumPadEnter => KeyCode::Enter,
        Key::Escape => KeyCode::Escape,
        Key::Space => KeyCode::Space,

        Key::A => KeyCode::A,
        Key::B => KeyCode::B,
        Key::C => KeyCode::C,
        Key::D => KeyCode::D,
        Key::E => KeyCode::E,
        Key::F => KeyCode::F,
        Key::G => KeyCode::G,
        Key::H => KeyCode::H,
        Key::I => KeyCode::I,
        Key::J => KeyCode::J,
        Key::K => KeyCode::K,
        Key::L => KeyCode::L,
        Key::M => KeyCode::M,
        Key::N => KeyCode::N,
        Key::O => KeyCode::O,
        Key::P => KeyCode::P,
        Key::Q => KeyCode::Q,
        Key::R => KeyCode::R,
        Key::S => KeyCode::S,
        Key::T => KeyCode::T,
        Key::U => KeyCode::U,
        Key::V => KeyCode::V,
        Key::W => KeyCode::W,
        Key::X => KeyCode::X,
        Key::Y => KeyCode::Y,
        Key::Z => KeyCode::Z,

        Key::Key0 | Key::NumPad0 => KeyCode::Num0,
        Key::Key1 | Key::NumPad1 => KeyCode::Num1,
        Key::Key2 | Key::NumPad2 => KeyCode::Num2,
        Key::Key3 | Key::NumPad3 => KeyCode::Num3,
        Key::Key4 | Key::NumPad4 => KeyCode::Num4,
        Key::Key5 | Key::NumPad5 => KeyCode::Num5,
        Key::Key6 | Key::NumPad6 => KeyCode::Num6,
        Key::Key7 | Key::NumPad7 => KeyCode::Num7,
        Key::Key8 | Key::NumPad8 => KeyCode::Num8,
        Key::Key9 | Key::NumPad9 => KeyCode::Num9,

        Key::F1 => KeyCode::F1,
        Key::F2 => KeyCode::F2,
        Key::F3 => KeyCode::F3,
        Key::F4 => KeyCode::F4,
        Key::F5 => KeyCode::F5,
        Key::F6 => KeyCode::F6,
        Key::F7 => KeyCode::F7,
        Key::F8 => KeyCode::F8,
        Key::F9 => KeyCode::F9,
        Key::F10 => KeyCode::F10,
        Key::F11 => KeyCode::F11,
        Key::F12 => KeyCode::F12,

        Key::LeftShift | Key::RightShift => KeyCode::Shift,
        Key::LeftCtrl | Key::RightCtrl => KeyCode::Ctrl,
        Key::LeftAlt | Key::RightAlt => KeyCode::Alt,

        Key::NumPadPlus => KeyCode::Plus,
        Key::Minus | Key::NumPadMinus => KeyCode::Minus,
        Key::Equal => KeyCode::Equals,
        Key::LeftBracket => KeyCode::LeftBracket,
        Key::RightBracket => KeyCode::RightBracket,
        Key::Comma => KeyCode::Comma,
        Key::Period | Key::NumPadDot => KeyCode::Period,
        Key::Slash | Key::NumPadSlash => KeyCode::Slash,
        Key::Semicolon => KeyCode::Semicolon,
        Key::Apostrophe => KeyCode::Apostrophe,
        Key::Backslash => KeyCode::Backslash,
        Key::Backquote => KeyCode::Grave,

        _ => KeyCode::Unknown,
    }
}

pub fn translate_button(button: NativeButton) -> MouseButton {
    match button {
        NativeButton::Left => MouseButton::Left,
        NativeButton::Right => MouseButton::Right,
        NativeButton::Middle => MouseButton::Middle,
    }
}

pub fn native_button(button: MouseButton) -> Option<NativeButton> {
    match button {
        MouseButton::Left => Some(NativeButton::Left),
        MouseButton::Right => Some(NativeButton::Right),
        MouseButton::Middle => Some(NativeButton::Middle),
        MouseButton::None => None,
    }
}

/// egui key for the keys the overlay's widgets react to.
pub fn egui_key(key: KeyCode) -> Option<egui::Key> {
    use egui::Key as E;

    let key = match key {
        KeyCode::Up => E::ArrowUp,
        KeyCode::Down => E::ArrowDown,
        KeyCode::Left => E::ArrowLeft,
        KeyCode::Right => E::ArrowRight,
        KeyCode::Home => E::Home,
        KeyCode::End => E::End,
        KeyCode::PageUp => E::PageUp,
        KeyCode::PageDown => E::PageDown,
        KeyCode::Delete => E::Delete,
        KeyCode::Backspace => E::Backspace,
        KeyCode::Tab => E::Tab,
        KeyCode::Enter => E::Enter,
        KeyCode::Escape => E::Escape,
        KeyCode::Space => E::Space,
        KeyCode::A => E::A,
        KeyCode::C => E::C,
        KeyCode::V => E::V,
        KeyCode::X => E::X,
        KeyCode::Z => E::Z,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numpad_and_main_digits_agree() {
        assert_eq!(translate_key(Key::Key7), KeyCode::Num7);
        assert_eq!(translate_key(Key::NumPad7), KeyCode::Num7);
        assert_eq!(translate_key(Key::NumPadEnter), KeyCode::Enter);
    }

    #[test]
    fn unmapped_keys_are_unknown() {
        assert_eq!(translate_key(Key::CapsLock), KeyCode::Unknown);
        assert_eq!(translate_key(Key::Equal), KeyCode::Equals);
    }

    #[test]
    fn buttons_round_trip() {
        for button in [NativeButton::Left, NativeButton::Right, NativeButton::Middle] {
            assert_eq!(native_button(translate_button(button)), Some(button));
        }
        assert_eq!(native_button(MouseButton::None), None);
    }
}
