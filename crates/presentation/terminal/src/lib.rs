//! Terminal presentation backend.
//!
//! Character-grid rendering on top of ratatui and keyboard/mouse input read
//! through crossterm. [`StdoutRenderer`] and [`StdinInput`] bind to the
//! process terminal; the generic [`TerminalRenderer`] and [`TerminalInput`]
//! accept any ratatui backend and [`EventSource`], which is how the tests
//! drive them without a tty.
//!
//! While the renderer is initialized the terminal is in raw mode on the
//! alternate screen; both are restored on shutdown or drop.
pub mod input;
pub mod renderer;
pub mod session;
pub mod source;
pub mod theme;
pub mod translate;

pub use input::{StdinInput, TerminalInput};
pub use renderer::{HUD_ROWS, StdoutRenderer, TerminalRenderer};
pub use session::TerminalSession;
pub use source::{CrosstermEvents, EventSource, ScriptedEvents};
pub use theme::TerminalTheme;
