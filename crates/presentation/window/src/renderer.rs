//! Framebuffer renderer for a native window.
use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use presentation_core::{
    Capabilities, CreatureView, FrameGuard, HudData, KeyBindings, MenuCursor, MenuOption,
    MenuStep, MouseButton, OverlayIntents, Renderer, Result, TileView, Viewport, WorldDetails,
    WorldView, Zoom,
};

use crate::{
    host::{NativeEvent, SharedHost, WindowHost, WindowSpec},
    input::WindowInput,
    overlay::Overlay,
    palette,
    surface::{GLYPH_SIZE, Surface, text_width},
};

pub const DEFAULT_TILE_SIZE: u32 = 8;
pub const MIN_TILE_SIZE: u32 = 2;
pub const MAX_TILE_SIZE: u32 = 32;

/// Pixel rows reserved for the HUD band at the bottom of the window.
pub const HUD_HEIGHT: u32 = 24;

const MENU_ROW: i32 = GLYPH_SIZE + 6;
const MENU_PADDING: i32 = 12;
const MENU_POLL: Duration = Duration::from_millis(10);

enum HostMode {
    Native(WindowSpec),
    Headless { width: usize, height: usize },
}

/// Pixel geometry of a modal menu.
struct MenuLayout {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    rows_top: i32,
}

impl MenuLayout {
    fn new(surface: &Surface, title: &str, options: &[MenuOption]) -> Self {
        let widest = options
            .iter()
            .map(|option| text_width(&option.text, 1) + 4 * GLYPH_SIZE)
            .chain(std::iter::once(text_width(title, 1)))
            .max()
            .unwrap_or(0);
        let width = widest + 2 * MENU_PADDING;
        let height = MENU_ROW * (options.len() as i32 + 1) + 2 * MENU_PADDING;
        let x = (surface.width() as i32 - width) / 2;
        let y = (surface.height() as i32 - height) / 2;
        Self {
            x,
            y,
            width,
            height,
            rows_top: y + MENU_PADDING + MENU_ROW,
        }
    }

    fn row_at(&self, px: i32, py: i32) -> Option<usize> {
        if px < self.x || px >= self.x + self.width || py < self.rows_top {
            return None;
        }
        Some(((py - self.rows_top) / MENU_ROW) as usize)
    }
}

/// Renderer drawing into a software framebuffer shown by a minifb window.
///
/// The window host lives in a shared slot so [`WindowInput`] handles can
/// observe it without owning it. Creatures are drawn as sprites; the overlay
/// is painted last, on top of everything else.
pub struct WindowRenderer {
    overlay: Overlay,
    frame: FrameGuard,
    tile_size: u32,
    mode: HostMode,
    host: SharedHost,
}

impl WindowRenderer {
    pub fn new(spec: WindowSpec) -> Self {
        Self::with_mode(HostMode::Native(spec))
    }

    /// Renderer with no native window, driven by injected events.
    pub fn headless(width: usize, height: usize) -> Self {
        Self::with_mode(HostMode::Headless { width, height })
    }

    fn with_mode(mode: HostMode) -> Self {
        Self {
            overlay: Overlay::new(),
            frame: FrameGuard::default(),
            tile_size: DEFAULT_TILE_SIZE,
            mode,
            host: Rc::new(RefCell::new(None)),
        }
    }

    /// Input handler reading this renderer's window.
    pub fn input_handler(&self) -> WindowInput {
        WindowInput::new(Rc::downgrade(&self.host))
    }

    /// Runs `f` against the host; `None` while uninitialized.
    pub fn with_host<R>(&self, f: impl FnOnce(&mut WindowHost) -> R) -> Option<R> {
        self.host.borrow_mut().as_mut().map(f)
    }

    pub fn overlay_state(&self) -> &Overlay {
        &self.overlay
    }

    pub fn frame_guard(&self) -> &FrameGuard {
        &self.frame
    }

    fn surface_size(&self) -> (u32, u32) {
        if let Some(host) = self.host.borrow().as_ref() {
            return (host.surface().width() as u32, host.surface().height() as u32);
        }
        match &self.mode {
            HostMode::Native(spec) => (spec.width as u32, spec.height as u32),
            HostMode::Headless { width, height } => (*width as u32, *height as u32),
        }
    }

    fn map_height(&self) -> i32 {
        self.surface_size().1.saturating_sub(HUD_HEIGHT) as i32
    }

    fn draw_tile(&self, surface: &mut Surface, tile: &TileView, tx: i32, ty: i32, map_height: i32) {
        let ts = self.tile_size as i32;
        let (px, py) = (tx * ts, ty * ts);
        if py >= map_height {
            return;
        }
        let h = ts.min(map_height - py);

        surface.fill_rect(px, py, ts, h, palette::tile(tile));
        if let Some(plant) = tile.plant {
            let inset = ts / 4;
            let inner = (h - 2 * inset).max(0);
            let color = palette::plant(plant);
            surface.fill_rect(px + inset, py + inset, ts - 2 * inset, inner, color);
        }
        if tile.food {
            let dot = (ts / 3).max(1);
            surface.fill_rect(px + (ts - dot) / 2, py + (ts - dot) / 2, dot, dot, palette::FOOD);
        }
    }

    fn draw_menu(&self, title: &str, options: &[MenuOption], selected: usize) {
        self.with_host(|host| {
            let surface = host.surface_mut();
            let layout = MenuLayout::new(surface, title, options);
            let (x, y, width, height) = (layout.x, layout.y, layout.width, layout.height);

            surface.fill_rect(x, y, width, height, palette::MENU_BACKGROUND);
            surface.draw_rect(x, y, width, height, 2, palette::MENU_BORDER);
            surface.draw_text(x + MENU_PADDING, y + MENU_PADDING, 1, palette::MENU_TEXT, title);

            for (idx, option) in options.iter().enumerate() {
                let row_y = layout.rows_top + idx as i32 * MENU_ROW;
                if idx == selected {
                    let highlight = palette::MENU_SELECTED;
                    surface.fill_rect(x + 4, row_y - 3, width - 8, MENU_ROW, highlight);
                }
                let color = if option.enabled {
                    palette::MENU_TEXT
                } else {
                    palette::MENU_DISABLED
                };
                let label = match option.hotkey {
                    Some(hotkey) => format!("[{hotkey}] {}", option.text),
                    None => format!("    {}", option.text),
                };
                surface.draw_text(x + MENU_PADDING, row_y, 1, color, &label);
            }
            host.present();
        });
    }

    /// Next native event for the menu loop; `None` once nothing can arrive.
    fn next_menu_event(&self) -> Option<NativeEvent> {
        loop {
            let (event, exhausted) = self
                .with_host(|host| {
                    let event = host.next_event();
                    (event, host.is_exhausted())
                })
                .unwrap_or((None, true));
            match event {
                Some(event) => return Some(event),
                None if exhausted => return None,
                None => thread::sleep(MENU_POLL),
            }
        }
    }
}

impl Renderer for WindowRenderer {
    fn initialize(&mut self) -> Result<()> {
        if self.host.borrow().is_some() {
            return Ok(());
        }

        let host = match &self.mode {
            HostMode::Native(spec) => WindowHost::open(spec)?,
            HostMode::Headless { width, height } => WindowHost::headless(*width, *height),
        };
        tracing::info!(headless = host.is_headless(), "window renderer initialized");
        *self.host.borrow_mut() = Some(host);
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.host.borrow_mut().take().is_some() {
            tracing::info!("window renderer shut down");
        }
        self.frame.reset();
    }

    fn is_initialized(&self) -> bool {
        self.host.borrow().is_some()
    }

    fn begin_frame(&mut self) {
        self.frame.begin();
        let feed = self
            .with_host(|host| {
                host.surface_mut().clear(palette::BACKGROUND);
                host.drain_ui_feed()
            })
            .unwrap_or_default();
        self.overlay.begin_frame(feed);
    }

    fn end_frame(&mut self) {
        if !self.frame.end() {
            return;
        }
        if let Some(host) = self.host.borrow_mut().as_mut() {
            let capture = self.overlay.end_frame(host.surface_mut());
            host.set_capture(capture);
            host.present();
        }
    }

    fn render_world(&mut self, world: &dyn WorldView, viewport: &Viewport) {
        if !self.frame.check("render_world") {
            return;
        }
        let map_height = self.map_height();
        let span = viewport.visible_tiles(world.width(), world.height());

        let mut slot = self.host.borrow_mut();
        let Some(host) = slot.as_mut() else {
            return;
        };
        for (wx, wy) in span.iter() {
            let (Some(tile), Some((sx, sy))) = (world.tile(wx, wy), viewport.to_screen(wx, wy))
            else {
                continue;
            };
            self.draw_tile(host.surface_mut(), &tile, sx as i32, sy as i32, map_height);
            if let Some(plant) = tile.plant {
                self.overlay.record_plant((wx, wy), plant);
            }
        }
    }

    fn render_tile(&mut self, tile: &TileView, screen_x: i32, screen_y: i32) {
        if !self.frame.check("render_tile") {
            return;
        }
        let map_height = self.map_height();
        self.with_host(|host| {
            self.draw_tile(host.surface_mut(), tile, screen_x, screen_y, map_height);
        });
    }

    fn render_creatures(&mut self, creatures: &[&dyn CreatureView], viewport: &Viewport) {
        if !self.frame.check("render_creatures") {
            return;
        }
        for creature in creatures {
            let (wx, wy) = creature.position();
            if let Some((sx, sy)) = viewport.to_screen(wx, wy) {
                self.render_creature(*creature, sx as i32, sy as i32);
            }
        }
    }

    fn render_creature(&mut self, creature: &dyn CreatureView, screen_x: i32, screen_y: i32) {
        if !self.frame.check("render_creature") {
            return;
        }
        let ts = self.tile_size as i32;
        let map_height = self.map_height();
        let (px, py) = (screen_x * ts, screen_y * ts);
        if py + ts > map_height {
            return;
        }

        let color = palette::creature(creature);
        self.with_host(|host| {
            let surface = host.surface_mut();
            let inset = (ts / 6).max(if ts > 2 { 1 } else { 0 });
            let side = ts - 2 * inset;
            surface.fill_rect(px + inset, py + inset, side, side, color);
            if ts >= 8 {
                surface.draw_rect(px + inset, py + inset, side, side, 1, palette::BACKGROUND);
            }
        });
        self.overlay.record_creature(creature);
    }

    fn render_hud(&mut self, hud: &HudData) {
        if !self.frame.check("render_hud") {
            return;
        }
        self.overlay.record_hud(hud);

        let (width, height) = self.surface_size();
        let top = height.saturating_sub(HUD_HEIGHT) as i32;
        let status_color = if hud.paused {
            palette::HUD_PAUSED
        } else {
            palette::HUD_TEXT
        };
        let deaths = hud
            .deaths
            .breakdown()
            .iter()
            .map(|(label, count)| format!("{label} {count}"))
            .collect::<Vec<_>>()
            .join("  ");

        self.with_host(|host| {
            let surface = host.surface_mut();
            surface.fill_rect(0, top, width as i32, HUD_HEIGHT as i32, palette::HUD_BACKGROUND);
            surface.draw_text(4, top + 2, 1, status_color, &hud.status_line());
            let deaths = format!("Deaths: {deaths}");
            surface.draw_text(4, top + 4 + GLYPH_SIZE, 1, palette::HUD_TEXT, &deaths);
        });
    }

    fn render_world_details(&mut self, details: &WorldDetails) {
        if !self.frame.check("render_world_details") {
            return;
        }
        self.overlay.record_details(details);
    }

    fn render_message(&mut self, message: &str, x: i32, y: i32) {
        if !self.frame.check("render_message") {
            return;
        }
        self.with_host(|host| {
            let surface = host.surface_mut();
            let backdrop_width = text_width(message, 1) + 4;
            let backdrop = palette::MESSAGE_BACKDROP;
            surface.fill_rect(x - 2, y - 2, backdrop_width, GLYPH_SIZE + 4, backdrop);
            surface.draw_text(x, y, 1, palette::MESSAGE_TEXT, message);
        });
    }

    fn render_menu(
        &mut self,
        title: &str,
        options: &[MenuOption],
        bindings: &KeyBindings,
    ) -> Option<usize> {
        let mut cursor = MenuCursor::new(options)?;
        if !self.is_initialized() {
            tracing::warn!("render_menu called on an uninitialized window renderer");
            return None;
        }

        let choice = loop {
            self.draw_menu(title, options, cursor.selected());

            let Some(event) = self.next_menu_event() else {
                break None;
            };
            match event {
                NativeEvent::KeyDown(code) => {
                    match cursor.step(options, code, bindings.action_for(code)) {
                        MenuStep::Chosen(idx) => break Some(idx),
                        MenuStep::Cancelled => break None,
                        MenuStep::Moved | MenuStep::Ignored => {}
                    }
                }
                NativeEvent::MouseDown {
                    button: MouseButton::Left,
                    x,
                    y,
                } => {
                    let hit = self
                        .with_host(|host| {
                            MenuLayout::new(host.surface(), title, options).row_at(x, y)
                        })
                        .flatten();
                    let enabled = |idx: &usize| options.get(*idx).is_some_and(|o| o.enabled);
                    if let Some(idx) = hit.filter(enabled) {
                        break Some(idx);
                    }
                }
                NativeEvent::CloseRequested => break None,
                _ => {}
            }
        };

        // Menu keystrokes are not for the overlay.
        self.with_host(|host| host.drain_ui_feed());
        choice
    }

    fn screen_width(&self) -> u32 {
        self.surface_size().0
    }

    fn screen_height(&self) -> u32 {
        self.surface_size().1
    }

    fn viewport_width(&self) -> u32 {
        self.surface_size().0 / self.tile_size
    }

    fn viewport_height(&self) -> u32 {
        self.surface_size().1.saturating_sub(HUD_HEIGHT) / self.tile_size
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn zoom(&mut self) -> Option<&mut dyn Zoom> {
        Some(self)
    }

    fn overlay(&mut self) -> Option<&mut dyn OverlayIntents> {
        Some(&mut self.overlay)
    }
}

impl Zoom for WindowRenderer {
    fn zoom_in(&mut self) {
        self.tile_size = (self.tile_size * 2).min(MAX_TILE_SIZE);
        tracing::debug!(tile_size = self.tile_size, "zoom in");
    }

    fn zoom_out(&mut self) {
        self.tile_size = (self.tile_size / 2).max(MIN_TILE_SIZE);
        tracing::debug!(tile_size = self.tile_size, "zoom out");
    }

    fn zoom_level(&self) -> f32 {
        self.tile_size as f32 / DEFAULT_TILE_SIZE as f32
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }
}

impl Drop for WindowRenderer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
