//! Character-grid renderer.
//!
//! Draws into ratatui's current buffer between `begin_frame` and `end_frame`
//! and flushes the diff on `end_frame`. One cell per world tile; the bottom
//! [`HUD_ROWS`] rows belong to the HUD.
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{Event, KeyEvent};
use presentation_core::{
    BackendKind, Capabilities, CreatureView, FrameGuard, HudData, InputAction, KeyBindings,
    MenuCursor, MenuOption, MenuStep, OverlayIntents, PresentationError, Renderer, Result,
    TileView, Viewport, WorldDetails, WorldView, Zoom,
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::{
    session::TerminalSession,
    source::{CrosstermEvents, EventSource},
    theme::TerminalTheme,
    translate,
};

/// Rows reserved for the HUD at the bottom of the screen.
pub const HUD_ROWS: u16 = 2;

const DETAILS_WIDTH: u16 = 30;

const CAPABILITIES: Capabilities = Capabilities::COLOR
    .union(Capabilities::MOUSE)
    .union(Capabilities::RESIZING)
    .union(Capabilities::UNICODE);

/// Renderer for the process terminal.
pub type StdoutRenderer = TerminalRenderer<CrosstermBackend<Stdout>, CrosstermEvents>;

/// Terminal renderer over any ratatui backend.
///
/// `S` feeds the modal `render_menu` loop. The ratatui backend is consumed by
/// `initialize`; a renderer that was shut down cannot be initialized again.
pub struct TerminalRenderer<B: Backend, S: EventSource = CrosstermEvents> {
    backend: Option<B>,
    terminal: Option<Terminal<B>>,
    source: S,
    manage_session: bool,
    session: Option<TerminalSession>,
    theme: TerminalTheme,
    frame: FrameGuard,
    size: (u16, u16),
    input_delay: Duration,
}

impl StdoutRenderer {
    /// Renderer that takes over stdout (raw mode + alternate screen) on
    /// `initialize`.
    pub fn stdout() -> Self {
        let mut renderer = Self::new(CrosstermBackend::new(io::stdout()), CrosstermEvents);
        renderer.manage_session = true;
        renderer
    }
}

impl<B: Backend, S: EventSource> TerminalRenderer<B, S> {
    pub fn new(backend: B, source: S) -> Self {
        Self {
            backend: Some(backend),
            terminal: None,
            source,
            manage_session: false,
            session: None,
            theme: TerminalTheme,
            frame: FrameGuard::default(),
            size: (0, 0),
            input_delay: Duration::from_millis(100),
        }
    }

    /// Poll interval of the modal menu loop.
    pub fn with_input_delay(mut self, delay: Duration) -> Self {
        self.input_delay = delay;
        self
    }

    /// Backend the frames were flushed to.
    pub fn backend(&self) -> Option<&B> {
        self.terminal.as_ref().map(Terminal::backend)
    }

    /// Frame bracket bookkeeping, for diagnostics.
    pub fn frame_guard(&self) -> &FrameGuard {
        &self.frame
    }

    fn map_rows(&self) -> u16 {
        self.size.1.saturating_sub(HUD_ROWS)
    }

    /// Current buffer when a draw is allowed right now.
    fn draw_target(&mut self, op: &'static str) -> Option<&mut Buffer> {
        if !self.frame.check(op) {
            return None;
        }
        self.terminal.as_mut().map(Terminal::current_buffer_mut)
    }

    fn refresh_size(&mut self) {
        let Some(terminal) = self.terminal.as_mut() else {
            return;
        };
        if let Err(err) = terminal.autoresize() {
            tracing::warn!(error = %err, "terminal resize failed");
        }
        match terminal.size() {
            Ok(size) => self.size = (size.width, size.height),
            Err(err) => tracing::warn!(error = %err, "terminal size query failed"),
        }
    }

    fn draw_menu(
        &mut self,
        title: &str,
        options: &[MenuOption],
        selected: usize,
    ) -> io::Result<()> {
        let theme = self.theme;
        let Some(terminal) = self.terminal.as_mut() else {
            return Ok(());
        };

        terminal.draw(|frame| {
            let inner_width = options
                .iter()
                .map(|o| o.text.chars().count() + 8)
                .chain(std::iter::once(title.chars().count() + 4))
                .max()
                .unwrap_or(0);
            let area = centered(
                frame.area(),
                inner_width as u16 + 2,
                options.len() as u16 + 2,
            );

            let lines: Vec<Line> = options
                .iter()
                .enumerate()
                .map(|(idx, option)| {
                    let marker = if idx == selected { "►" } else { " " };
                    let hotkey = option
                        .hotkey
                        .map(|hk| format!("[{hk}]"))
                        .unwrap_or_else(|| "   ".to_string());
                    let style = if !option.enabled {
                        theme.menu_disabled()
                    } else if idx == selected {
                        theme.menu_selected()
                    } else {
                        Style::default()
                    };
                    Line::from(vec![
                        Span::raw(format!("{marker} {hotkey} ")),
                        Span::styled(option.text.clone(), style),
                    ])
                })
                .collect();

            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(lines).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(theme.border())
                        .title(format!(" {title} ")),
                ),
                area,
            );
        })?;

        Ok(())
    }

    /// Next key press for the menu loop; `Ok(None)` when the poll timed out or
    /// the event was not a press.
    fn next_menu_key(&mut self) -> io::Result<Option<KeyEvent>> {
        if self.source.is_closed() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "event source closed",
            ));
        }
        if !self.source.poll(self.input_delay)? {
            return Ok(None);
        }
        match self.source.read()? {
            Event::Key(key) if translate::is_press(&key) => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}

impl<B: Backend, S: EventSource> Renderer for TerminalRenderer<B, S> {
    fn initialize(&mut self) -> Result<()> {
        if self.terminal.is_some() {
            return Ok(());
        }
        if self.backend.is_none() {
            return Err(PresentationError::display_unavailable(
                BackendKind::Terminal,
                "terminal backend already consumed",
            ));
        }

        // Session first: if it fails the backend is still ours.
        let session = if self.manage_session {
            Some(TerminalSession::enter()?)
        } else {
            None
        };

        let Some(backend) = self.backend.take() else {
            return Err(PresentationError::display_unavailable(
                BackendKind::Terminal,
                "terminal backend already consumed",
            ));
        };
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        let size = terminal.size()?;

        self.size = (size.width, size.height);
        self.terminal = Some(terminal);
        self.session = session;

        tracing::info!(
            width = self.size.0,
            height = self.size.1,
            "terminal renderer initialized"
        );
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(mut terminal) = self.terminal.take() {
            let _ = terminal.show_cursor();
            tracing::info!("terminal renderer shut down");
        }
        // Dropping the session restores the terminal.
        self.session = None;
        self.frame.reset();
    }

    fn is_initialized(&self) -> bool {
        self.terminal.is_some()
    }

    fn begin_frame(&mut self) {
        self.frame.begin();
        self.refresh_size();
    }

    fn end_frame(&mut self) {
        if !self.frame.end() {
            return;
        }
        let Some(terminal) = self.terminal.as_mut() else {
            return;
        };

        let flushed = terminal.flush().and_then(|()| {
            terminal.swap_buffers();
            terminal.backend_mut().flush()
        });
        if let Err(err) = flushed {
            tracing::warn!(error = %err, "terminal flush failed");
        }
    }

    fn render_world(&mut self, world: &dyn WorldView, viewport: &Viewport) {
        let theme = self.theme;
        let rows = self.map_rows();
        let Some(buf) = self.draw_target("render_world") else {
            return;
        };

        let span = viewport.visible_tiles(world.width(), world.height());
        for (wx, wy) in span.iter() {
            let (Some(tile), Some((sx, sy))) = (world.tile(wx, wy), viewport.to_screen(wx, wy))
            else {
                continue;
            };
            put(buf, sx as i32, sy as i32, rows, theme.tile(&tile));
        }
    }

    fn render_tile(&mut self, tile: &TileView, screen_x: i32, screen_y: i32) {
        let theme = self.theme;
        let rows = self.map_rows();
        if let Some(buf) = self.draw_target("render_tile") {
            put(buf, screen_x, screen_y, rows, theme.tile(tile));
        }
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
        let theme = self.theme;
        let rows = self.map_rows();
        if let Some(buf) = self.draw_target("render_creature") {
            put(buf, screen_x, screen_y, rows, theme.creature(creature));
        }
    }

    fn render_hud(&mut self, hud: &HudData) {
        let theme = self.theme;
        let (width, height) = self.size;
        let Some(buf) = self.draw_target("render_hud") else {
            return;
        };
        if height < HUD_ROWS || width == 0 {
            return;
        }

        let top = height - HUD_ROWS;
        let status_style = if hud.paused {
            theme.hud_paused()
        } else {
            theme.hud()
        };
        buf.set_style(Rect::new(0, top, width, HUD_ROWS), theme.hud());
        buf.set_style(Rect::new(0, top, width, 1), status_style);
        buf.set_stringn(0, top, hud.status_line(), width as usize, status_style);

        let deaths = hud
            .deaths
            .breakdown()
            .iter()
            .map(|(label, count)| format!("{label} {count}"))
            .collect::<Vec<_>>()
            .join(" · ");
        let detail = format!(
            "view ({}, {}) of {}x{} | deaths: {}",
            hud.viewport_x, hud.viewport_y, hud.world_width, hud.world_height, deaths
        );
        buf.set_stringn(0, top + 1, detail, width as usize, theme.hud());
    }

    fn render_world_details(&mut self, details: &WorldDetails) {
        let theme = self.theme;
        let (width, height) = self.size;
        let Some(buf) = self.draw_target("render_world_details") else {
            return;
        };

        let lines: Vec<Line> = details.lines().into_iter().map(Line::from).collect();
        let panel_width = DETAILS_WIDTH.min(width);
        let panel_height = (lines.len() as u16 + 2).min(height.saturating_sub(HUD_ROWS));
        let area = Rect::new(width - panel_width, 0, panel_width, panel_height);

        Clear.render(area, buf);
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border())
                    .title(" World "),
            )
            .render(area, buf);
    }

    fn render_message(&mut self, message: &str, x: i32, y: i32) {
        let theme = self.theme;
        let (width, _) = self.size;
        let Some(buf) = self.draw_target("render_message") else {
            return;
        };
        if x < 0 || y < 0 || x >= i32::from(width) {
            return;
        }
        let (x, y) = (x as u16, y as u16);
        if y >= buf.area.height {
            return;
        }
        buf.set_stringn(x, y, message, (width - x) as usize, theme.message());
    }

    fn render_menu(
        &mut self,
        title: &str,
        options: &[MenuOption],
        bindings: &KeyBindings,
    ) -> Option<usize> {
        let mut cursor = MenuCursor::new(options)?;
        if self.terminal.is_none() {
            tracing::warn!("render_menu called on an uninitialized terminal renderer");
            return None;
        }

        loop {
            if let Err(err) = self.draw_menu(title, options, cursor.selected()) {
                tracing::warn!(error = %err, "menu draw failed");
                return None;
            }

            let key = match self.next_menu_key() {
                Ok(Some(key)) => key,
                Ok(None) => continue,
                Err(err) => {
                    tracing::debug!(error = %err, "menu input ended");
                    return None;
                }
            };

            let code = translate::translate_key(&key);
            let action = if translate::is_interrupt(&key) {
                Some(InputAction::Quit)
            } else {
                bindings.action_for(code)
            };

            match cursor.step(options, code, action) {
                MenuStep::Chosen(idx) => return Some(idx),
                MenuStep::Cancelled => return None,
                MenuStep::Moved | MenuStep::Ignored => {}
            }
        }
    }

    fn screen_width(&self) -> u32 {
        u32::from(self.size.0)
    }

    fn screen_height(&self) -> u32 {
        u32::from(self.size.1)
    }

    fn viewport_width(&self) -> u32 {
        u32::from(self.size.0)
    }

    fn viewport_height(&self) -> u32 {
        u32::from(self.map_rows())
    }

    fn capabilities(&self) -> Capabilities {
        CAPABILITIES
    }

    fn zoom(&mut self) -> Option<&mut dyn Zoom> {
        None
    }

    fn overlay(&mut self) -> Option<&mut dyn OverlayIntents> {
        None
    }
}

impl<B: Backend, S: EventSource> Drop for TerminalRenderer<B, S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Writes one glyph inside the map area.
fn put(buf: &mut Buffer, x: i32, y: i32, rows: u16, (glyph, style): (char, Style)) {
    if x < 0 || y < 0 || y >= i32::from(rows) || x > i32::from(u16::MAX) {
        return;
    }
    if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
        cell.set_char(glyph).set_style(style);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedEvents;
    use crossterm::event::KeyCode as TermKey;
    use presentation_core::{Diet, KeyCode, Terrain, zoom_level};
    use ratatui::backend::TestBackend;

    struct Flat {
        width: u32,
        height: u32,
    }

    impl WorldView for Flat {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn tile(&self, x: i32, y: i32) -> Option<TileView> {
            if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
                return None;
            }
            Some(TileView {
                terrain: Terrain::Sand,
                ..TileView::default()
            })
        }
    }

    struct Bug {
        at: (i32, i32),
    }

    impl CreatureView for Bug {
        fn id(&self) -> u64 {
            1
        }
        fn position(&self) -> (i32, i32) {
            self.at
        }
        fn diet(&self) -> Diet {
            Diet::Carnivore
        }
        fn energy(&self) -> f32 {
            1.0
        }
        fn hydration(&self) -> f32 {
            1.0
        }
        fn age(&self) -> u64 {
            0
        }
    }

    fn renderer(events: &ScriptedEvents) -> TerminalRenderer<TestBackend, ScriptedEvents> {
        let mut renderer = TerminalRenderer::new(TestBackend::new(20, 8), events.clone())
            .with_input_delay(Duration::ZERO);
        renderer.initialize().unwrap();
        renderer
    }

    fn symbol(renderer: &TerminalRenderer<TestBackend, ScriptedEvents>, x: u16, y: u16) -> String {
        renderer
            .backend()
            .unwrap()
            .buffer()
            .cell((x, y))
            .unwrap()
            .symbol()
            .to_string()
    }

    #[test]
    fn capabilities_are_consistent_and_spriteless() {
        let renderer = renderer(&ScriptedEvents::new());
        let caps = renderer.capabilities();
        assert!(!caps.supports_sprites());
        assert_eq!(renderer.supports_sprites(), caps.supports_sprites());
        assert_eq!(renderer.supports_color(), caps.supports_color());
    }

    #[test]
    fn metrics_reserve_hud_rows() {
        let renderer = renderer(&ScriptedEvents::new());
        assert_eq!(renderer.screen_width(), 20);
        assert_eq!(renderer.screen_height(), 8);
        assert_eq!(renderer.viewport_width(), 20);
        assert_eq!(renderer.viewport_height(), 6);
    }

    #[test]
    fn world_and_creatures_are_drawn_inside_frame() {
        let mut renderer = renderer(&ScriptedEvents::new());
        let world = Flat { width: 5, height: 5 };
        let viewport = Viewport::new(-2, 0, 20, 6);
        let bug = Bug { at: (1, 1) };

        renderer.begin_frame();
        renderer.render_world(&world, &viewport);
        renderer.render_creatures(&[&bug], &viewport);
        renderer.end_frame();

        // World starts two cells in because the origin is negative.
        assert_eq!(symbol(&renderer, 0, 0), " ");
        assert_eq!(symbol(&renderer, 2, 0), ".");
        assert_eq!(symbol(&renderer, 6, 4), ".");
        assert_eq!(symbol(&renderer, 7, 4), " ");
        assert_eq!(symbol(&renderer, 3, 1), "X");
    }

    #[test]
    fn draws_outside_bracket_are_skipped() {
        let mut renderer = renderer(&ScriptedEvents::new());
        renderer.render_message("lost", 0, 0);

        renderer.begin_frame();
        renderer.end_frame();

        assert_eq!(symbol(&renderer, 0, 0), " ");
        assert_eq!(renderer.frame_guard().violations(), 1);
    }

    #[test]
    fn hud_occupies_bottom_rows() {
        let mut renderer = renderer(&ScriptedEvents::new());
        let hud = HudData {
            population: 3,
            ..HudData::default()
        };

        renderer.begin_frame();
        renderer.render_hud(&hud);
        renderer.end_frame();

        let row: String = (0..20).map(|x| symbol(&renderer, x, 6)).collect();
        assert!(row.contains("pop 3"), "{row}");
    }

    #[test]
    fn menu_skips_disabled_and_selects() {
        let events = ScriptedEvents::new();
        let mut renderer = renderer(&events);
        let defaults = KeyBindings::default();
        let options = vec![
            MenuOption::new("Resume"),
            MenuOption::new("Save").disabled(),
            MenuOption::new("Quit"),
        ];

        events.push_keys([TermKey::Down, TermKey::Enter]);
        assert_eq!(renderer.render_menu("Paused", &options, &defaults), Some(2));

        events.push_keys([TermKey::Char('j'), TermKey::Char('k'), TermKey::Enter]);
        assert_eq!(renderer.render_menu("Paused", &options, &defaults), Some(0));
    }

    #[test]
    fn menu_cancel_and_hotkeys() {
        let events = ScriptedEvents::new();
        let mut renderer = renderer(&events);
        let defaults = KeyBindings::default();
        let options = vec![
            MenuOption::new("Resume").with_hotkey('r'),
            MenuOption::new("Quit").with_hotkey('x'),
        ];

        events.push_key(TermKey::Esc);
        assert_eq!(renderer.render_menu("Paused", &options, &defaults), None);

        events.push_key(TermKey::Char('X'));
        assert_eq!(renderer.render_menu("Paused", &options, &defaults), Some(1));

        // Drained script behaves like a closed terminal.
        assert_eq!(renderer.render_menu("Paused", &options, &defaults), None);
    }

    #[test]
    fn menu_with_nothing_enabled_returns_immediately() {
        let events = ScriptedEvents::new();
        let mut renderer = renderer(&events);
        let defaults = KeyBindings::default();
        events.push_key(TermKey::Enter);

        let options = vec![MenuOption::new("Load").disabled()];
        assert_eq!(renderer.render_menu("Load", &options, &defaults), None);
        assert_eq!(events.pending(), 1);
    }

    #[test]
    fn menu_follows_remapped_bindings() {
        let events = ScriptedEvents::new();
        let mut renderer = renderer(&events);
        let options = vec![MenuOption::new("Resume"), MenuOption::new("Quit")];
        let mut bindings = KeyBindings::default();
        bindings.bind(KeyCode::Z, InputAction::MenuSelect);

        events.push_keys([TermKey::Down, TermKey::Char('z')]);
        assert_eq!(renderer.render_menu("Paused", &options, &bindings), Some(1));

        // An unbound arrow no longer moves the cursor.
        bindings.unbind(KeyCode::Down);
        events.push_keys([TermKey::Down, TermKey::Char('z')]);
        assert_eq!(renderer.render_menu("Paused", &options, &bindings), Some(0));
    }

    #[test]
    fn zoom_and_overlay_are_absent() {
        let mut renderer = renderer(&ScriptedEvents::new());
        assert!(renderer.zoom().is_none());
        assert!(renderer.overlay().is_none());
        assert_eq!(zoom_level(&mut renderer), 1.0);
    }

    #[test]
    fn initialize_is_idempotent_and_shutdown_final() {
        let mut renderer = renderer(&ScriptedEvents::new());
        assert!(renderer.initialize().is_ok());
        renderer.shutdown();
        renderer.shutdown();
        assert!(!renderer.is_initialized());
        assert!(renderer.initialize().is_err());
    }
}
