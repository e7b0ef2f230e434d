//! Backend-agnostic presentation primitives.
//!
//! Houses the data model, the canonical key binding table, and the renderer and
//! input contracts that both the terminal and the window backends implement.
//! Nothing in this crate touches a native display.
pub mod capabilities;
pub mod config;
pub mod error;
pub mod event;
pub mod hud;
pub mod input;
pub mod keys;
pub mod menu;
pub mod overlay;
pub mod renderer;
pub mod sim;
pub mod viewport;

pub use capabilities::Capabilities;
pub use config::{BackendKind, RenderConfig};
pub use error::{PresentationError, Result};
pub use event::{InputEvent, InputKind, MouseEvent};
pub use hud::{DeathStats, HudData, WorldDetails};
pub use input::InputHandler;
pub use keys::{DEFAULT_BINDINGS, InputAction, KeyBindings, KeyCode, MouseButton};
pub use menu::{MenuCursor, MenuOption, MenuStep};
pub use overlay::{FileExists, OverlayIntents, SaveFileInfo};
pub use renderer::{FrameGuard, Renderer, Zoom, take_recenter, zoom_level};
pub use sim::{CreatureView, Diet, PlantKind, Terrain, TileView, WorldView};
pub use viewport::{TileSpan, Viewport};
