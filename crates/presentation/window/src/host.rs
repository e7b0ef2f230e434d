//! Native window host.
//!
//! Owns the minifb window and the framebuffer it presents. Native state is
//! polled by [`WindowHost::pump`] and diffed into [`NativeEvent`]s, which feed
//! two consumers: the input handler (game queue) and the overlay (UI feed).
//! An event the game acted on is [claimed](WindowHost::claim_delivered) and
//! never reaches the overlay.
//! A headless host has no window at all; tests inject events directly.
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use minifb::{InputCallback, KeyRepeat, MouseMode, Window, WindowOptions};
use presentation_core::{BackendKind, KeyCode, MouseButton, PresentationError, Result};

use crate::{keymap, surface::Surface};

/// Shared slot for the host; empty until the renderer initializes and after it
/// shuts down.
pub type SharedHost = Rc<RefCell<Option<WindowHost>>>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NativeEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Typed text, for overlay text fields.
    Text(char),
    MouseMove { x: i32, y: i32 },
    MouseDown { button: MouseButton, x: i32, y: i32 },
    MouseUp { button: MouseButton, x: i32, y: i32 },
    /// Wheel lines, positive away from the user.
    Scroll(f32),
    Resized { width: usize, height: usize },
    CloseRequested,
}

/// Whether the overlay consumed input in the last frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiCapture {
    pub keyboard: bool,
    pub pointer: bool,
}

#[derive(Clone, Debug)]
pub struct WindowSpec {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub target_fps: u32,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            title: "Simulation".to_string(),
            width: 1024,
            height: 768,
            target_fps: 60,
        }
    }
}

struct TypedChars(Rc<RefCell<VecDeque<char>>>);

impl InputCallback for TypedChars {
    fn add_char(&mut self, uni_char: u32) {
        if let Some(ch) = char::from_u32(uni_char).filter(|ch| !ch.is_control()) {
            self.0.borrow_mut().push_back(ch);
        }
    }
}

const BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

pub struct WindowHost {
    window: Option<Window>,
    surface: Surface,
    events: VecDeque<(u64, NativeEvent)>,
    ui_feed: Vec<(u64, NativeEvent)>,
    next_seq: u64,
    delivered: Option<u64>,
    typed: Rc<RefCell<VecDeque<char>>>,
    held_keys: HashSet<KeyCode>,
    held_buttons: HashSet<MouseButton>,
    mouse: (i32, i32),
    capture: UiCapture,
    presented_since_pump: bool,
    close_reported: bool,
    presents: u64,
}

impl WindowHost {
    /// Opens a native window. Fails when no display can be reached.
    pub fn open(spec: &WindowSpec) -> Result<Self> {
        let options = WindowOptions {
            resize: true,
            ..WindowOptions::default()
        };
        let mut window = Window::new(&spec.title, spec.width, spec.height, options).map_err(|err| {
            PresentationError::display_unavailable(BackendKind::Window, err.to_string())
        })?;
        window.set_target_fps(spec.target_fps.max(1) as usize);

        let typed = Rc::new(RefCell::new(VecDeque::new()));
        window.set_input_callback(Box::new(TypedChars(Rc::clone(&typed))));

        let (width, height) = window.get_size();
        tracing::info!(width, height, title = %spec.title, "window opened");

        let mut host = Self::headless(width, height);
        host.window = Some(window);
        host.typed = typed;
        Ok(host)
    }

    /// Host without a native window.
    pub fn headless(width: usize, height: usize) -> Self {
        Self {
            window: None,
            surface: Surface::new(width, height),
            events: VecDeque::new(),
            ui_feed: Vec::new(),
            next_seq: 0,
            delivered: None,
            typed: Rc::new(RefCell::new(VecDeque::new())),
            held_keys: HashSet::new(),
            held_buttons: HashSet::new(),
            mouse: (0, 0),
            capture: UiCapture::default(),
            presented_since_pump: false,
            close_reported: false,
            presents: 0,
        }
    }

    pub fn is_headless(&self) -> bool {
        self.window.is_none()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Number of frames handed to the window (or swallowed, when headless).
    pub fn presents(&self) -> u64 {
        self.presents
    }

    pub fn capture(&self) -> UiCapture {
        self.capture
    }

    pub fn set_capture(&mut self, capture: UiCapture) {
        self.capture = capture;
    }

    pub fn mouse_position(&self) -> (i32, i32) {
        self.mouse
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.held_keys.contains(&key)
    }

    pub fn is_button_held(&self, button: MouseButton) -> bool {
        self.held_buttons.contains(&button)
    }

    /// True once nothing more can arrive: the window closed, or a headless
    /// host ran out of injected events.
    pub fn is_exhausted(&self) -> bool {
        self.events.is_empty() && (self.window.is_none() || self.close_reported)
    }

    /// Queues an event as if the native layer produced it.
    pub fn inject(&mut self, event: NativeEvent) {
        self.record(event);
    }

    fn record(&mut self, event: NativeEvent) {
        match event {
            NativeEvent::KeyDown(key) => {
                self.held_keys.insert(key);
            }
            NativeEvent::KeyUp(key) => {
                self.held_keys.remove(&key);
            }
            NativeEvent::MouseMove { x, y } => self.mouse = (x, y),
            NativeEvent::MouseDown { button, x, y } => {
                self.mouse = (x, y);
                self.held_buttons.insert(button);
            }
            NativeEvent::MouseUp { button, x, y } => {
                self.mouse = (x, y);
                self.held_buttons.remove(&button);
            }
            NativeEvent::Resized { width, height } => self.surface.resize(width, height),
            NativeEvent::CloseRequested => self.close_reported = true,
            NativeEvent::Text(_) | NativeEvent::Scroll(_) => {}
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push_back((seq, event));
        self.ui_feed.push((seq, event));
    }

    /// Polls the native window and queues what changed since the last pump.
    pub fn pump(&mut self) {
        let Some(window) = self.window.as_mut() else {
            return;
        };
        if !self.presented_since_pump {
            window.update();
        }
        self.presented_since_pump = false;

        let mut fresh = Vec::new();

        if !window.is_open() && !self.close_reported {
            fresh.push(NativeEvent::CloseRequested);
        }

        let (width, height) = window.get_size();
        let changed = (width, height) != (self.surface.width(), self.surface.height());
        if changed && width > 0 && height > 0 {
            fresh.push(NativeEvent::Resized { width, height });
        }

        for key in window.get_keys_pressed(KeyRepeat::Yes) {
            fresh.push(NativeEvent::KeyDown(keymap::translate_key(key)));
        }
        for key in window.get_keys_released() {
            fresh.push(NativeEvent::KeyUp(keymap::translate_key(key)));
        }
        fresh.extend(self.typed.borrow_mut().drain(..).map(NativeEvent::Text));

        if let Some((mx, my)) = window.get_mouse_pos(MouseMode::Discard) {
            let pos = (mx as i32, my as i32);
            if pos != self.mouse {
                fresh.push(NativeEvent::MouseMove { x: pos.0, y: pos.1 });
            }
        }
        let (x, y) = window
            .get_mouse_pos(MouseMode::Clamp)
            .map_or(self.mouse, |(mx, my)| (mx as i32, my as i32));
        for button in BUTTONS {
            let Some(native) = keymap::native_button(button) else {
                continue;
            };
            let down = window.get_mouse_down(native);
            let held = self.held_buttons.contains(&button);
            if down && !held {
                fresh.push(NativeEvent::MouseDown { button, x, y });
            } else if !down && held {
                fresh.push(NativeEvent::MouseUp { button, x, y });
            }
        }
        if let Some((_, dy)) = window.get_scroll_wheel() {
            if dy != 0.0 {
                fresh.push(NativeEvent::Scroll(dy));
            }
        }

        for event in fresh {
            self.record(event);
        }
    }

    /// Next event for the input handler, pumping when the queue is empty.
    pub fn next_event(&mut self) -> Option<NativeEvent> {
        if self.events.is_empty() {
            self.pump();
        }
        let (seq, event) = self.events.pop_front()?;
        self.delivered = Some(seq);
        Some(event)
    }

    /// Withholds the event last returned by [`next_event`](Self::next_event)
    /// from the overlay.
    pub fn claim_delivered(&mut self) {
        if let Some(seq) = self.delivered.take() {
            self.ui_feed.retain(|(recorded, _)| *recorded != seq);
        }
    }

    /// Everything recorded since the overlay last looked, minus claimed events.
    pub fn drain_ui_feed(&mut self) -> Vec<NativeEvent> {
        self.delivered = None;
        std::mem::take(&mut self.ui_feed)
            .into_iter()
            .map(|(_, event)| event)
            .collect()
    }

    /// Shows the surface in the window.
    pub fn present(&mut self) {
        self.presents += 1;
        let Some(window) = self.window.as_mut() else {
            return;
        };
        let (width, height) = (self.surface.width(), self.surface.height());
        if let Err(err) = window.update_with_buffer(self.surface.pixels(), width, height) {
            tracing::warn!(error = %err, "window present failed");
        }
        self.presented_since_pump = true;
    }
}

impl Drop for WindowHost {
    fn drop(&mut self) {
        if self.window.take().is_some() {
            tracing::info!("window closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injected_events_track_state_and_feed_both_consumers() {
        let mut host = WindowHost::headless(64, 32);
        host.inject(NativeEvent::KeyDown(KeyCode::W));
        host.inject(NativeEvent::MouseDown {
            button: MouseButton::Left,
            x: 5,
            y: 6,
        });

        assert!(host.is_key_held(KeyCode::W));
        assert!(host.is_button_held(MouseButton::Left));
        assert_eq!(host.mouse_position(), (5, 6));

        assert_eq!(host.next_event(), Some(NativeEvent::KeyDown(KeyCode::W)));
        assert_eq!(host.drain_ui_feed().len(), 2);
        assert!(host.drain_ui_feed().is_empty());
    }

    #[test]
    fn claimed_events_are_withheld_from_the_ui_feed() {
        let mut host = WindowHost::headless(16, 16);
        host.inject(NativeEvent::KeyDown(KeyCode::Escape));
        host.inject(NativeEvent::KeyUp(KeyCode::Escape));

        assert_eq!(host.next_event(), Some(NativeEvent::KeyDown(KeyCode::Escape)));
        host.claim_delivered();
        host.claim_delivered();
        assert_eq!(host.next_event(), Some(NativeEvent::KeyUp(KeyCode::Escape)));

        assert_eq!(
            host.drain_ui_feed(),
            vec![NativeEvent::KeyUp(KeyCode::Escape)]
        );
    }

    #[test]
    fn headless_host_is_exhausted_once_drained() {
        let mut host = WindowHost::headless(8, 8);
        assert!(host.is_exhausted());
        host.inject(NativeEvent::KeyUp(KeyCode::A));
        assert!(!host.is_exhausted());
        host.next_event();
        assert!(host.is_exhausted());
        assert_eq!(host.next_event(), None);
    }

    #[test]
    fn resize_event_resizes_surface() {
        let mut host = WindowHost::headless(8, 8);
        host.inject(NativeEvent::Resized {
            width: 20,
            height: 10,
        });
        assert_eq!(host.surface().width(), 20);
        assert_eq!(host.surface().pixels().len(), 200);
    }

    #[test]
    fn headless_present_is_counted() {
        let mut host = WindowHost::headless(8, 8);
        host.present();
        host.present();
        assert_eq!(host.presents(), 2);
        assert!(host.is_headless());
    }
}
