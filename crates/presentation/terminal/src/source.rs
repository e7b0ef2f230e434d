//! Blocking / non-blocking terminal event reads.
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent},
    execute,
};

/// Native terminal event primitive.
pub trait EventSource {
    /// Waits up to `timeout` for an event; `Duration::ZERO` does not block.
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Reads the next event. Only call after `poll` returned true.
    fn read(&mut self) -> io::Result<Event>;

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()>;

    /// True when no event can ever arrive again.
    fn is_closed(&self) -> bool {
        false
    }
}

/// Events from the process terminal.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            execute!(io::stdout(), EnableMouseCapture)
        } else {
            execute!(io::stdout(), DisableMouseCapture)
        }
    }
}

/// Pre-recorded events, for tests and replays.
///
/// Clones share one queue, so a test can keep a handle and push events after
/// the source was handed to a renderer or input handler. The source reports
/// itself closed once the queue is drained.
#[derive(Clone, Debug, Default)]
pub struct ScriptedEvents {
    queue: Rc<RefCell<VecDeque<Event>>>,
    mouse_capture: Rc<Cell<bool>>,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.queue.borrow_mut().push_back(event);
    }

    pub fn push_key(&self, code: KeyCode) {
        self.push(Event::Key(KeyEvent::from(code)));
    }

    pub fn push_keys(&self, codes: impl IntoIterator<Item = KeyCode>) {
        for code in codes {
            self.push_key(code);
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn mouse_capture(&self) -> bool {
        self.mouse_capture.get()
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.queue.borrow().is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.queue
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        self.mouse_capture.set(enabled);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
