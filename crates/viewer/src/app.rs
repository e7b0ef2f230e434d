//! Frame loop driving the ecosystem through a presentation backend.
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use presentation::{
    CreatureView, InputAction, InputEvent, InputKind, MenuOption, Presentation, SaveFileInfo,
    Viewport, take_recenter,
};

use crate::world::{Ecosystem, Params};

/// Snapshots kept for the session; the viewer has no on-disk saves.
type SaveSlots = Rc<RefCell<BTreeMap<String, Params>>>;

const PAN_STEP: i32 = 2;
const MIN_TICKS_PER_FRAME: u32 = 1;
const MAX_TICKS_PER_FRAME: u32 = 16;

enum Flow {
    Continue,
    Exit,
}

pub struct ViewerApp {
    presentation: Presentation,
    world: Ecosystem,
    center: (i32, i32),
    paused: bool,
    show_details: bool,
    ticks_per_frame: u32,
    saves: SaveSlots,
    message: Option<String>,
}

impl ViewerApp {
    pub fn new(presentation: Presentation, world: Ecosystem) -> Self {
        let center = world.center();
        Self {
            presentation,
            world,
            center,
            paused: false,
            show_details: false,
            ticks_per_frame: MIN_TICKS_PER_FRAME,
            saves: Rc::new(RefCell::new(BTreeMap::new())),
            message: None,
        }
    }

    /// Runs until the user quits.
    pub fn run(mut self) -> Result<()> {
        let saves = Rc::clone(&self.saves);
        if let Some(overlay) = self.presentation.renderer().overlay() {
            overlay.set_file_exists(Box::new(move |name: &str| saves.borrow().contains_key(name)));
            overlay.set_save_files(Vec::new());
        }

        let frame_interval = self.presentation.config().frame_interval();
        let mut last_frame = Instant::now();
        tracing::info!(backend = %self.presentation.backend(), "viewer loop started");

        loop {
            if let Some(center) = take_recenter(self.presentation.renderer()) {
                tracing::debug!(?center, "recentering on overlay request");
                self.center = center;
            }

            let elapsed = last_frame.elapsed().as_secs_f32().max(f32::EPSILON);
            last_frame = Instant::now();
            self.draw(self.ticks_per_frame as f32 / elapsed);

            let event = self.presentation.input().wait_for_input(Some(frame_interval));
            if let Flow::Exit = self.dispatch(event) {
                break;
            }
            if let Flow::Exit = self.consume_overlay_intents() {
                break;
            }

            let modal = self
                .presentation
                .renderer()
                .overlay()
                .is_some_and(|overlay| overlay.is_modal());
            if !self.paused && !modal {
                for _ in 0..self.ticks_per_frame {
                    self.world.step();
                }
            }
        }

        tracing::info!("viewer loop finished");
        self.presentation.shutdown();
        Ok(())
    }

    fn draw(&mut self, tick_rate: f32) {
        let renderer = self.presentation.renderer();
        let viewport = Viewport::centered_on(
            self.center.0,
            self.center.1,
            renderer.viewport_width(),
            renderer.viewport_height(),
        );
        let hud = self.world.hud((viewport.x, viewport.y), tick_rate, self.paused);
        let critters: Vec<&dyn CreatureView> = self
            .world
            .critters()
            .iter()
            .map(|critter| critter as &dyn CreatureView)
            .collect();

        renderer.begin_frame();
        renderer.render_world(&self.world, &viewport);
        renderer.render_creatures(&critters, &viewport);
        renderer.render_hud(&hud);
        if self.show_details {
            renderer.render_world_details(&self.world.details());
        }
        if let Some(message) = &self.message {
            renderer.render_message(message, 1, 0);
        }
        renderer.end_frame();
    }

    fn dispatch(&mut self, event: InputEvent) -> Flow {
        if let InputKind::Mouse(mouse) = event.kind {
            if let Some(zoom) = self.presentation.renderer().zoom() {
                match mouse.scroll {
                    w if w > 0 => zoom.zoom_in(),
                    w if w < 0 => zoom.zoom_out(),
                    _ => {}
                }
            }
            return Flow::Continue;
        }

        let Some(action) = event.action else {
            return Flow::Continue;
        };
        // A quit with no key behind it is the window being closed.
        if action == InputAction::Quit && !event.has_event() {
            return Flow::Exit;
        }

        if let Some(level) = action.terrain_level() {
            self.world.set_terrain_level(level);
            self.world.regenerate();
            return Flow::Continue;
        }

        match action {
            InputAction::MoveUp => self.center.1 -= PAN_STEP,
            InputAction::MoveDown => self.center.1 += PAN_STEP,
            InputAction::MoveLeft => self.center.0 -= PAN_STEP,
            InputAction::MoveRight => self.center.0 += PAN_STEP,
            InputAction::Pause => self.paused = !self.paused,
            InputAction::SpeedUp => {
                self.ticks_per_frame = (self.ticks_per_frame * 2).min(MAX_TICKS_PER_FRAME);
            }
            InputAction::SlowDown => {
                self.ticks_per_frame = (self.ticks_per_frame / 2).max(MIN_TICKS_PER_FRAME);
            }
            InputAction::ToggleDetails => self.show_details = !self.show_details,
            InputAction::ZoomIn | InputAction::ZoomOut => {
                if let Some(zoom) = self.presentation.renderer().zoom() {
                    if action == InputAction::ZoomIn {
                        zoom.zoom_in();
                    } else {
                        zoom.zoom_out();
                    }
                }
            }
            InputAction::Regenerate => {
                self.world.params_mut().seed += 1;
                self.world.regenerate();
            }
            InputAction::Quit => return self.pause_menu(),
            editor => self.tune(editor),
        }
        Flow::Continue
    }

    /// World editor adjustments; regenerates when a parameter changed.
    fn tune(&mut self, action: InputAction) {
        let params = self.world.params_mut();
        match action {
            InputAction::ScaleUp => params.scale = (params.scale * 1.25).min(8.0),
            InputAction::ScaleDown => params.scale = (params.scale / 1.25).max(0.1),
            InputAction::OctavesUp => params.octaves = (params.octaves + 1).min(8),
            InputAction::OctavesDown => params.octaves = params.octaves.saturating_sub(1).max(1),
            InputAction::PersistenceUp => params.persistence = (params.persistence + 0.05).min(1.0),
            InputAction::PersistenceDown => {
                params.persistence = (params.persistence - 0.05).max(0.05);
            }
            InputAction::LacunarityUp => params.lacunarity = (params.lacunarity + 0.1).min(4.0),
            InputAction::LacunarityDown => params.lacunarity = (params.lacunarity - 0.1).max(1.0),
            InputAction::FrequencyUp => params.frequency = (params.frequency * 1.1).min(0.5),
            InputAction::FrequencyDown => params.frequency = (params.frequency / 1.1).max(0.005),
            _ => return,
        }
        self.world.regenerate();
    }

    /// Quit key: the overlay's pause menu when there is one, a modal menu
    /// otherwise.
    fn pause_menu(&mut self) -> Flow {
        let (renderer, input) = self.presentation.parts_mut();
        if let Some(overlay) = renderer.overlay() {
            overlay.toggle_pause_menu();
            return Flow::Continue;
        }

        let options = [
            MenuOption::new("Resume").with_hotkey('r'),
            MenuOption::new("Quit").with_hotkey('q'),
        ];
        match renderer.render_menu("Paused", &options, input.bindings()) {
            Some(1) => Flow::Exit,
            _ => Flow::Continue,
        }
    }

    fn consume_overlay_intents(&mut self) -> Flow {
        let Some(overlay) = self.presentation.renderer().overlay() else {
            return Flow::Continue;
        };

        if let Some(name) = overlay.save_filename().map(str::to_owned) {
            self.saves
                .borrow_mut()
                .insert(name.clone(), self.world.params().clone());
            let files = self.saves.borrow().keys().map(SaveFileInfo::new).collect();
            overlay.set_save_files(files);
            overlay.clear_save_filename();
            tracing::info!(%name, "snapshot saved");
            self.message = Some(format!("Saved {name}"));
        }

        if let Some(name) = overlay.load_filename().map(str::to_owned) {
            overlay.clear_load_filename();
            let params = self.saves.borrow().get(&name).cloned();
            match params {
                Some(params) => {
                    *self.world.params_mut() = params;
                    self.world.regenerate();
                    tracing::info!(%name, "snapshot loaded");
                    self.message = Some(format!("Loaded {name}"));
                }
                None => tracing::warn!(%name, "load requested for unknown snapshot"),
            }
        }

        if overlay.quit_requested() {
            overlay.clear_quit_request();
            return Flow::Exit;
        }
        Flow::Continue
    }
}
