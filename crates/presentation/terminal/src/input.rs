//! Terminal input handler.
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crossterm::event::Event;
use presentation_core::{
    InputAction, InputEvent, InputHandler, KeyBindings, KeyCode, MouseButton, Result,
};

use crate::{
    source::{CrosstermEvents, EventSource},
    translate,
};

/// Input handler for the process terminal.
pub type StdinInput = TerminalInput<CrosstermEvents>;

/// Keyboard and mouse input read from a terminal event source.
///
/// Terminals report presses but not releases, so `is_key_pressed` answers
/// whether `key` produced the most recent event. The answer resets when a
/// poll finds nothing pending.
pub struct TerminalInput<S: EventSource = CrosstermEvents> {
    source: S,
    bindings: KeyBindings,
    initialized: bool,
    mouse_enabled: bool,
    last_key: KeyCode,
    mouse_position: (i32, i32),
    mouse_buttons: HashSet<MouseButton>,
    input_delay: Duration,
}

impl StdinInput {
    pub fn stdin() -> Self {
        Self::new(CrosstermEvents)
    }
}

impl<S: EventSource> TerminalInput<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            bindings: KeyBindings::default(),
            initialized: false,
            mouse_enabled: false,
            last_key: KeyCode::None,
            mouse_position: (0, 0),
            mouse_buttons: HashSet::new(),
            input_delay: Duration::from_millis(100),
        }
    }

    /// Slice length of an indefinite `wait_for_input`.
    pub fn with_input_delay(mut self, delay: Duration) -> Self {
        self.input_delay = delay;
        self
    }

    /// Reads one event if one is ready within `timeout`.
    fn next_event(&mut self, timeout: Duration) -> Option<InputEvent> {
        if !self.initialized {
            return None;
        }

        let ready = match self.source.poll(timeout) {
            Ok(ready) => ready,
            Err(err) => {
                tracing::warn!(error = %err, "terminal poll failed");
                return None;
            }
        };
        if !ready {
            return None;
        }

        match self.source.read() {
            Ok(event) => Some(self.translate(event)),
            Err(err) => {
                tracing::warn!(error = %err, "terminal read failed");
                None
            }
        }
    }

    fn translate(&mut self, event: Event) -> InputEvent {
        match event {
            Event::Key(key) if translate::is_press(&key) => {
                let code = translate::translate_key(&key);
                self.last_key = code;
                let action = if translate::is_interrupt(&key) {
                    Some(InputAction::Quit)
                } else {
                    self.bindings.action_for(code)
                };
                InputEvent::key(code).with_action(action)
            }
            Event::Mouse(mouse) if self.mouse_enabled => {
                let Some(event) = translate::translate_mouse(&mouse) else {
                    return InputEvent::none();
                };
                self.mouse_position = (event.x, event.y);
                if event.pressed {
                    self.mouse_buttons.insert(event.button);
                }
                if event.released {
                    self.mouse_buttons.remove(&event.button);
                }
                InputEvent::mouse(event)
            }
            _ => InputEvent::none(),
        }
    }
}

impl<S: EventSource> InputHandler for TerminalInput<S> {
    fn initialize(&mut self) -> Result<()> {
        self.initialized = true;
        tracing::debug!("terminal input initialized");
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        if self.mouse_enabled {
            self.enable_mouse_input(false);
        }
        self.initialized = false;
        self.last_key = KeyCode::None;
        self.mouse_buttons.clear();
        tracing::debug!("terminal input shut down");
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn poll_input(&mut self) -> InputEvent {
        let event = self.next_event(Duration::ZERO).unwrap_or_default();
        // Terminals report no releases; a key counts as held until something
        // else, ignored events included, is polled.
        if !event.is_key_event() {
            self.last_key = KeyCode::None;
        }
        event
    }

    fn wait_for_input(&mut self, timeout: Option<Duration>) -> InputEvent {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);

        loop {
            let slice = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => self.input_delay,
            };

            if let Some(event) = self.next_event(slice) {
                if event.has_event() {
                    return event;
                }
                // Ignored event (release, focus, resize); keep waiting.
                continue;
            }

            let expired = deadline.is_some_and(|deadline| Instant::now() >= deadline);
            if expired || !self.initialized || self.source.is_closed() {
                return InputEvent::none();
            }
        }
    }

    fn is_key_pressed(&self, key: KeyCode) -> bool {
        key != KeyCode::None && self.last_key == key
    }

    fn mouse_position(&self) -> (i32, i32) {
        self.mouse_position
    }

    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    fn supports_mouse_input(&self) -> bool {
        true
    }

    fn enable_mouse_input(&mut self, enabled: bool) {
        if self.mouse_enabled == enabled {
            return;
        }
        match self.source.set_mouse_capture(enabled) {
            Ok(()) => {
                self.mouse_enabled = enabled;
                if !enabled {
                    self.mouse_buttons.clear();
                }
            }
            Err(err) => tracing::warn!(error = %err, enabled, "mouse capture toggle failed"),
        }
    }

    fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }
}

impl<S: EventSource> Drop for TerminalInput<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
