//! Graphical presentation backend.
//!
//! Renders into a software framebuffer presented by a `minifb` window, draws
//! creatures as sprites, and layers an egui overlay (statistics, inspectors,
//! pause/save/load dialogs) on top. Text uses the `font8x8` bitmap font.
//!
//! [`WindowRenderer`] owns the window; [`WindowInput`] handles obtained from
//! [`WindowRenderer::input_handler`] only observe it. A headless renderer
//! skips the native window entirely, which is how the tests run.
pub mod host;
pub mod input;
pub mod keymap;
pub mod overlay;
pub mod palette;
pub mod renderer;
pub mod surface;

pub use host::{NativeEvent, UiCapture, WindowHost, WindowSpec};
pub use input::WindowInput;
pub use overlay::{DialogFlow, DialogState, Overlay};
pub use renderer::{DEFAULT_TILE_SIZE, HUD_HEIGHT, MAX_TILE_SIZE, MIN_TILE_SIZE, WindowRenderer};
pub use surface::Surface;
