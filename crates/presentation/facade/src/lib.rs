//! Presentation facade: backend selection and lifecycle for the simulation
//! viewer.
//!
//! # Architecture
//!
//! ```text
//! Presentation (owns one backend)
//!   ├─→ InputHandler (terminal events, or window events minus overlay captures)
//!   └─→ Renderer (terminal grid, or framebuffer window)
//!         └─→ Overlay (window only: egui panels and save/load dialogs)
//! ```
//!
//! # Frame Loop
//!
//! Applications drive the presentation in this order, once per frame:
//!
//! 1. `take_recenter` (consume an overlay recenter request, move the viewport)
//! 2. `begin_frame`
//! 3. draws: `render_world`, `render_creatures`, `render_hud`, ...
//! 4. `end_frame` (the overlay paints here and presents)
//! 5. `poll_input` / `wait_for_input`
//! 6. dispatch the event's action; consume overlay save/load/quit intents
//!
//! The overlay's input capture is decided in step 4, so events it consumed in
//! a frame are filtered from the next poll. Keys the game acted on in step 5
//! are withheld from the overlay's next `begin_frame`.
//!
//! # Composition
//!
//! - [`Presentation`]: an explicit, independent instance (preferred)
//! - [`registry`]: one process-wide instance for a binary's `main`
//!
//! # Features
//!
//! - `terminal`: ratatui/crossterm backend
//! - `window`: minifb window backend with the egui overlay

mod factory;
mod presentation;
pub mod registry;

pub use factory::{auto_candidates, display_detectable, resolve_auto};
pub use presentation::Presentation;

pub use presentation_core::*;

#[cfg(feature = "terminal")]
pub use presentation_terminal as terminal;
#[cfg(feature = "window")]
pub use presentation_window as window;
