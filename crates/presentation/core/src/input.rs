//! Input contract implemented by every input backend.
use std::time::Duration;

use crate::{
    error::Result,
    event::InputEvent,
    keys::{InputAction, KeyBindings, KeyCode, MouseButton},
};

/// Input source abstraction.
///
/// Lifecycle: `initialize` → (`poll_input` | `wait_for_input`)* → `shutdown`.
///
/// Every handler owns a private [`KeyBindings`] copy; remapping through one
/// handler never affects another.
pub trait InputHandler {
    fn initialize(&mut self) -> Result<()>;
    fn shutdown(&mut self);
    fn is_initialized(&self) -> bool;

    /// Returns the next pending event without blocking, or
    /// [`InputEvent::none`].
    fn poll_input(&mut self) -> InputEvent;

    /// Blocks until an event arrives or `timeout` elapses (`None` waits
    /// indefinitely). Expiry yields [`InputEvent::none`].
    fn wait_for_input(&mut self, timeout: Option<Duration>) -> InputEvent;

    /// Current logical state of `key`.
    ///
    /// Backends without key-state tracking report whether `key` was the key of
    /// the most recent event; callers must not assume held-key semantics.
    fn is_key_pressed(&self, key: KeyCode) -> bool;

    /// True if any key bound to `action` is pressed.
    fn is_action_pressed(&self, action: InputAction) -> bool {
        self.bindings()
            .keys_for(action)
            .any(|key| self.is_key_pressed(key))
    }

    fn mouse_position(&self) -> (i32, i32);
    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool;

    fn supports_mouse_input(&self) -> bool;
    /// No-op when `supports_mouse_input()` is false.
    fn enable_mouse_input(&mut self, enabled: bool);

    fn bindings(&self) -> &KeyBindings;
    fn bindings_mut(&mut self) -> &mut KeyBindings;

    fn map_key_to_action(&mut self, key: KeyCode, action: InputAction) {
        self.bindings_mut().bind(key, action);
    }

    fn action_for_key(&self, key: KeyCode) -> Option<InputAction> {
        self.bindings().action_for(key)
    }

    fn reset_key_mappings(&mut self) {
        self.bindings_mut().reset();
    }
}
