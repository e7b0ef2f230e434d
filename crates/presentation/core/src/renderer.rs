//! Renderer contract implemented by every graphical backend.
use crate::{
    capabilities::Capabilities,
    error::Result,
    hud::{HudData, WorldDetails},
    keys::KeyBindings,
    menu::MenuOption,
    overlay::OverlayIntents,
    sim::{CreatureView, TileView, WorldView},
    viewport::Viewport,
};

/// Drawing surface abstraction.
///
/// Lifecycle: `initialize` → (`begin_frame` → draw calls → `end_frame`)* →
/// `shutdown`.
///
/// Draw calls receive simulation values by shared reference and coordinates the
/// caller already resolved; the renderer only scales tiles to cells or pixels
/// and clips against the world. Drawing outside a `begin_frame`/`end_frame`
/// bracket is a caller contract violation: implementations log it and skip the
/// draw (see [`FrameGuard`]).
///
/// # Implementations
///
/// - `TerminalRenderer`: character grid (ratatui buffer, crossterm input for menus)
/// - `WindowRenderer`: software framebuffer in a native window, with overlay
pub trait Renderer {
    /// Acquires the display. Fails without leaking partially acquired native
    /// resources; calling it again once initialized is a no-op.
    fn initialize(&mut self) -> Result<()>;

    /// Releases the display. Safe to call repeatedly.
    fn shutdown(&mut self);

    fn is_initialized(&self) -> bool;

    fn begin_frame(&mut self);
    fn end_frame(&mut self);

    /// Draws every world tile inside `viewport`.
    fn render_world(&mut self, world: &dyn WorldView, viewport: &Viewport);

    /// Draws one tile at screen tile coordinates.
    fn render_tile(&mut self, tile: &TileView, screen_x: i32, screen_y: i32);

    /// Draws the creatures that fall inside `viewport`.
    fn render_creatures(&mut self, creatures: &[&dyn CreatureView], viewport: &Viewport);

    /// Draws one creature at screen tile coordinates.
    fn render_creature(&mut self, creature: &dyn CreatureView, screen_x: i32, screen_y: i32);

    fn render_hud(&mut self, hud: &HudData);

    fn render_world_details(&mut self, details: &WorldDetails);

    /// Draws a text line at screen coordinates (cells or pixels).
    fn render_message(&mut self, message: &str, x: i32, y: i32);

    /// Shows a modal menu and blocks on input until the user picks an enabled
    /// option (its zero-based index) or cancels (`None`).
    ///
    /// This is the only renderer method that polls input itself. Keys resolve
    /// through `bindings`, normally the active input handler's table.
    fn render_menu(
        &mut self,
        title: &str,
        options: &[MenuOption],
        bindings: &KeyBindings,
    ) -> Option<usize>;

    /// Screen size in the backend's unit (cells or pixels).
    fn screen_width(&self) -> u32;
    fn screen_height(&self) -> u32;

    /// Number of world tiles that fit in the map area.
    fn viewport_width(&self) -> u32;
    fn viewport_height(&self) -> u32;

    fn capabilities(&self) -> Capabilities;

    fn supports_color(&self) -> bool {
        self.capabilities().supports_color()
    }

    fn supports_sprites(&self) -> bool {
        self.capabilities().supports_sprites()
    }

    /// Zoom control, when the backend has one.
    fn zoom(&mut self) -> Option<&mut dyn Zoom>;

    /// Overlay intents (save/load/recentre), when the backend has an overlay.
    fn overlay(&mut self) -> Option<&mut dyn OverlayIntents>;
}

/// Tile-size zoom control.
///
/// Implementations clamp to their documented minimum and maximum tile size.
pub trait Zoom {
    fn zoom_in(&mut self);
    fn zoom_out(&mut self);
    /// Current tile size relative to the backend's default.
    fn zoom_level(&self) -> f32;
    /// Current tile size in backend units.
    fn tile_size(&self) -> u32;
}

/// Zoom level of `renderer`, `1.0` when it cannot zoom.
pub fn zoom_level(renderer: &mut dyn Renderer) -> f32 {
    renderer.zoom().map_or(1.0, |zoom| zoom.zoom_level())
}

/// Takes and clears a pending overlay recentre request, if any.
pub fn take_recenter(renderer: &mut dyn Renderer) -> Option<(i32, i32)> {
    let overlay = renderer.overlay()?;
    let pending = overlay.pending_recenter()?;
    overlay.clear_pending_recenter();
    Some(pending)
}

/// Tracks the `begin_frame`/`end_frame` bracket for a renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameGuard {
    in_frame: bool,
    violations: u64,
}

impl FrameGuard {
    pub fn begin(&mut self) {
        if self.in_frame {
            self.violation("begin_frame");
        }
        self.in_frame = true;
    }

    /// Closes the bracket; returns false if no frame was open.
    pub fn end(&mut self) -> bool {
        if !self.in_frame {
            self.violation("end_frame");
            return false;
        }
        self.in_frame = false;
        true
    }

    /// Returns true if `op` may draw now. Logs and counts a violation otherwise.
    pub fn check(&mut self, op: &'static str) -> bool {
        if !self.in_frame {
            self.violation(op);
        }
        self.in_frame
    }

    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// Number of bracket violations seen so far.
    pub fn violations(&self) -> u64 {
        self.violations
    }

    pub fn reset(&mut self) {
        self.in_frame = false;
    }

    fn violation(&mut self, op: &'static str) {
        self.violations += 1;
        tracing::warn!(op, "renderer call outside begin_frame/end_frame bracket");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_are_allowed_only_inside_bracket() {
        let mut guard = FrameGuard::default();
        assert!(!guard.check("render_hud"));
        guard.begin();
        assert!(guard.check("render_hud"));
        assert!(guard.end());
        assert!(!guard.check("render_hud"));
        assert_eq!(guard.violations(), 2);
    }

    #[test]
    fn unbalanced_end_is_reported() {
        let mut guard = FrameGuard::default();
        assert!(!guard.end());
        guard.begin();
        guard.begin();
        assert_eq!(guard.violations(), 2);
        assert!(guard.in_frame());
    }
}
