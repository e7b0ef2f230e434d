//! Input handler reading the window renderer's event queue.
use std::cell::RefCell;
use std::rc::Weak;
use std::thread;
use std::time::{Duration, Instant};

use presentation_core::{
    BackendKind, InputAction, InputEvent, InputHandler, InputKind, KeyBindings, KeyCode,
    MouseButton, MouseEvent, PresentationError, Result,
};

use crate::host::{NativeEvent, WindowHost};

const WAIT_SLICE: Duration = Duration::from_millis(5);

/// Keyboard and mouse input from a [`WindowRenderer`](crate::WindowRenderer)'s
/// window.
///
/// Holds a weak handle: once the renderer is gone every query degrades to "no
/// event". Events the overlay captured in the last frame never reach the game,
/// and key presses the game acted on never reach the overlay. Closing the
/// window yields an event with no key and the `Quit` action.
pub struct WindowInput {
    host: Weak<RefCell<Option<WindowHost>>>,
    bindings: KeyBindings,
    initialized: bool,
    mouse_enabled: bool,
}

impl WindowInput {
    pub fn new(host: Weak<RefCell<Option<WindowHost>>>) -> Self {
        Self {
            host,
            bindings: KeyBindings::default(),
            initialized: false,
            mouse_enabled: false,
        }
    }

    fn with_host<R>(&self, f: impl FnOnce(&mut WindowHost) -> R) -> Option<R> {
        let host = self.host.upgrade()?;
        let mut slot = host.borrow_mut();
        slot.as_mut().map(f)
    }

    fn translate(&self, event: NativeEvent, host: &WindowHost) -> Option<InputEvent> {
        let capture = host.capture();
        match event {
            NativeEvent::KeyDown(code) if !capture.keyboard => {
                Some(InputEvent::key(code).with_action(self.bindings.action_for(code)))
            }
            NativeEvent::CloseRequested => Some(InputEvent {
                kind: InputKind::None,
                action: Some(InputAction::Quit),
            }),
            _ if !self.mouse_enabled || capture.pointer => None,
            NativeEvent::MouseMove { x, y } => Some(InputEvent::mouse(MouseEvent::moved(x, y))),
            NativeEvent::MouseDown { button, x, y } => {
                Some(InputEvent::mouse(MouseEvent::press(x, y, button)))
            }
            NativeEvent::MouseUp { button, x, y } => {
                Some(InputEvent::mouse(MouseEvent::release(x, y, button)))
            }
            NativeEvent::Scroll(lines) if lines != 0.0 => {
                let (x, y) = host.mouse_position();
                Some(InputEvent::mouse(MouseEvent::wheel(x, y, lines.signum() as i32)))
            }
            _ => None,
        }
    }
}

fn is_meaningful(event: &InputEvent) -> bool {
    event.has_event() || event.action.is_some()
}

impl InputHandler for WindowInput {
    fn initialize(&mut self) -> Result<()> {
        if self.host.upgrade().is_none() {
            return Err(PresentationError::display_unavailable(
                BackendKind::Window,
                "window renderer no longer exists",
            ));
        }
        self.initialized = true;
        tracing::debug!("window input initialized");
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.initialized {
            self.initialized = false;
            tracing::debug!("window input shut down");
        }
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn poll_input(&mut self) -> InputEvent {
        if !self.initialized {
            return InputEvent::none();
        }
        self.with_host(|host| {
            while let Some(native) = host.next_event() {
                if let Some(event) = self.translate(native, host) {
                    if event.is_key_event() && event.action.is_some() {
                        host.claim_delivered();
                    }
                    return event;
                }
            }
            InputEvent::none()
        })
        .unwrap_or_default()
    }

    fn wait_for_input(&mut self, timeout: Option<Duration>) -> InputEvent {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);

        loop {
            let event = self.poll_input();
            if is_meaningful(&event) {
                return event;
            }

            let exhausted = self.with_host(|host| host.is_exhausted()).unwrap_or(true);
            if exhausted || !self.initialized {
                return InputEvent::none();
            }

            let slice = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return InputEvent::none();
                    }
                    remaining.min(WAIT_SLICE)
                }
                None => WAIT_SLICE,
            };
            thread::sleep(slice);
        }
    }

    fn is_key_pressed(&self, key: KeyCode) -> bool {
        key != KeyCode::None && self.with_host(|host| host.is_key_held(key)).unwrap_or(false)
    }

    fn mouse_position(&self) -> (i32, i32) {
        self.with_host(|host| host.mouse_position()).unwrap_or_default()
    }

    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.with_host(|host| host.is_button_held(button)).unwrap_or(false)
    }

    fn supports_mouse_input(&self) -> bool {
        true
    }

    fn enable_mouse_input(&mut self, enabled: bool) {
        self.mouse_enabled = enabled;
    }

    fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }
}
