//! Input events produced by every input backend.
use crate::keys::{InputAction, KeyCode, MouseButton};

/// Snapshot of a single mouse interaction.
///
/// Coordinates are in the backend's screen units (cells or pixels).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseEvent {
    pub x: i32,
    pub y: i32,
    pub button: MouseButton,
    pub pressed: bool,
    pub released: bool,
    /// Wheel delta; positive scrolls up.
    pub scroll: i32,
}

impl MouseEvent {
    pub const fn moved(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            button: MouseButton::None,
            pressed: false,
            released: false,
            scroll: 0,
        }
    }

    pub const fn press(x: i32, y: i32, button: MouseButton) -> Self {
        Self {
            x,
            y,
            button,
            pressed: true,
            released: false,
            scroll: 0,
        }
    }

    pub const fn release(x: i32, y: i32, button: MouseButton) -> Self {
        Self {
            x,
            y,
            button,
            pressed: false,
            released: true,
            scroll: 0,
        }
    }

    pub const fn wheel(x: i32, y: i32, scroll: i32) -> Self {
        Self {
            x,
            y,
            button: MouseButton::None,
            pressed: false,
            released: false,
            scroll,
        }
    }
}

/// Payload of an [`InputEvent`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputKind {
    /// Nothing was pending.
    #[default]
    None,
    Key(KeyCode),
    Mouse(MouseEvent),
}

/// One polled input result, with the action it resolved to (if any).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: InputKind,
    pub action: Option<InputAction>,
}

impl InputEvent {
    /// The "nothing pending" result.
    pub const fn none() -> Self {
        Self {
            kind: InputKind::None,
            action: None,
        }
    }

    pub const fn key(code: KeyCode) -> Self {
        Self {
            kind: InputKind::Key(code),
            action: None,
        }
    }

    pub const fn mouse(event: MouseEvent) -> Self {
        Self {
            kind: InputKind::Mouse(event),
            action: None,
        }
    }

    pub const fn with_action(mut self, action: Option<InputAction>) -> Self {
        self.action = action;
        self
    }

    pub fn is_mouse_event(&self) -> bool {
        matches!(self.kind, InputKind::Mouse(_))
    }

    pub fn is_key_event(&self) -> bool {
        matches!(self.kind, InputKind::Key(code) if code != KeyCode::None)
    }

    pub fn has_event(&self) -> bool {
        self.is_key_event() || self.is_mouse_event()
    }

    /// Key carried by this event, `KeyCode::None` otherwise.
    pub fn key_code(&self) -> KeyCode {
        match self.kind {
            InputKind::Key(code) => code,
            _ => KeyCode::None,
        }
    }

    pub fn mouse_event(&self) -> Option<&MouseEvent> {
        match &self.kind {
            InputKind::Mouse(event) => Some(event),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_event_has_nothing() {
        let event = InputEvent::none();
        assert!(!event.has_event());
        assert!(!event.is_key_event());
        assert!(!event.is_mouse_event());
        assert_eq!(event, InputEvent::default());
    }

    #[test]
    fn key_none_is_not_a_key_event() {
        let event = InputEvent::key(KeyCode::None);
        assert!(!event.is_key_event());
        assert!(!event.has_event());
    }

    #[test]
    fn mouse_default_has_no_button() {
        let mouse = MouseEvent::default();
        assert_eq!(mouse.button, MouseButton::None);
        assert!(!mouse.pressed && !mouse.released);
        assert_eq!(mouse.scroll, 0);
        assert!(InputEvent::mouse(mouse).has_event());
    }

    #[test]
    fn action_travels_with_event() {
        let event = InputEvent::key(KeyCode::Space).with_action(Some(InputAction::Pause));
        assert!(event.is_key_event());
        assert_eq!(event.key_code(), KeyCode::Space);
        assert_eq!(event.action, Some(InputAction::Pause));
    }
}
