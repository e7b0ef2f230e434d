//! Immediate-mode overlay drawn on top of the window renderer.
//!
//! The overlay keeps UI state the simulation does not care about: the
//! statistics panel, creature and plant inspectors, the world details panel,
//! and the pause/save/load dialogs driven by [`DialogFlow`].
//!
//! Each frame the renderer records what it drew (HUD snapshot, creatures,
//! plants) and hands the overlay the native events seen since the previous
//! frame. On `end_frame` the overlay builds its egui UI, paints it into the
//! framebuffer through [`SoftwarePainter`], and reports whether it wants the
//! keyboard or pointer so the input handler can keep those events away from
//! the game.
//!
//! Everything the overlay wants from the owning loop is staged as an intent
//! (see [`OverlayIntents`]); it never saves, loads, or moves a viewport itself.
pub mod dialog;
pub mod paint;

use std::time::Instant;

use egui::{Align2, Color32, Context, Key, Modifiers, PointerButton, Pos2, RawInput, Rect, Vec2};
use presentation_core::{
    CreatureView, Diet, FileExists, HudData, KeyCode, MouseButton, OverlayIntents, PlantKind,
    SaveFileInfo, WorldDetails,
};

pub use dialog::{DialogFlow, DialogState, SaveNameError};
pub use paint::SoftwarePainter;

use crate::{
    host::{NativeEvent, UiCapture},
    keymap,
    surface::Surface,
};

/// Rows kept per inspector list.
const INSPECTOR_ROWS: usize = 256;

/// Creature as listed by the inspector.
#[derive(Clone, Debug, PartialEq)]
pub struct CreatureRow {
    pub id: u64,
    pub label: String,
    pub position: (i32, i32),
    pub diet: Diet,
    pub energy: f32,
    pub hydration: f32,
    pub age: u64,
}

impl CreatureRow {
    pub fn from_view(creature: &dyn CreatureView) -> Self {
        Self {
            id: creature.id(),
            label: creature.label(),
            position: creature.position(),
            diet: creature.diet(),
            energy: creature.energy(),
            hydration: creature.hydration(),
            age: creature.age(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlantRow {
    pub position: (i32, i32),
    pub kind: PlantKind,
}

/// Outcome of a widget interaction, applied once the UI pass is done.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayAction {
    Resume,
    OpenSave,
    OpenLoad,
    Quit,
    SubmitSave,
    ConfirmOverwrite,
    CancelOverwrite,
    DismissPostSave,
    SelectLoad(usize),
    ConfirmLoad,
    Cancel,
    SelectCreature(u64),
    Recenter(i32, i32),
}

pub struct Overlay {
    ctx: Context,
    painter: SoftwarePainter,
    flow: DialogFlow,
    started: Instant,
    events: Vec<egui::Event>,
    modifiers: Modifiers,
    pointer: Pos2,
    hud: Option<HudData>,
    hud_age: u8,
    details: Option<WorldDetails>,
    creatures: Vec<CreatureRow>,
    plants: Vec<PlantRow>,
    selected_creature: Option<u64>,
    save_input: String,
    save_error: Option<SaveNameError>,
    focus_save_input: bool,
    pending_recenter: Option<(i32, i32)>,
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Overlay {
    pub fn new() -> Self {
        Self {
            ctx: Context::default(),
            painter: SoftwarePainter::new(),
            flow: DialogFlow::new(),
            started: Instant::now(),
            events: Vec::new(),
            modifiers: Modifiers::default(),
            pointer: Pos2::ZERO,
            hud: None,
            hud_age: 0,
            details: None,
            creatures: Vec::new(),
            plants: Vec::new(),
            selected_creature: None,
            save_input: String::new(),
            save_error: None,
            focus_save_input: false,
            pending_recenter: None,
        }
    }

    pub fn flow(&self) -> &DialogFlow {
        &self.flow
    }

    pub fn hud(&self) -> Option<&HudData> {
        self.hud.as_ref()
    }

    pub fn creatures(&self) -> &[CreatureRow] {
        &self.creatures
    }

    pub fn plants(&self) -> &[PlantRow] {
        &self.plants
    }

    /// Starts a frame: takes the native events seen since the last one and
    /// drops per-frame samples.
    pub fn begin_frame(&mut self, feed: Vec<NativeEvent>) {
        for event in feed {
            self.push_native(event);
        }

        // A HUD snapshot outlives its frame by one.
        self.hud_age = self.hud_age.saturating_add(1);
        if self.hud_age > 1 {
            self.hud = None;
        }
        self.details = None;
        self.creatures.clear();
        self.plants.clear();
    }

    pub fn record_hud(&mut self, hud: &HudData) {
        self.hud = Some(hud.clone());
        self.hud_age = 0;
    }

    pub fn record_details(&mut self, details: &WorldDetails) {
        self.details = Some(details.clone());
    }

    pub fn record_creature(&mut self, creature: &dyn CreatureView) {
        if self.creatures.len() < INSPECTOR_ROWS {
            self.creatures.push(CreatureRow::from_view(creature));
        }
    }

    pub fn record_plant(&mut self, position: (i32, i32), kind: PlantKind) {
        if self.plants.len() < INSPECTOR_ROWS {
            self.plants.push(PlantRow { position, kind });
        }
    }

    fn push_native(&mut self, event: NativeEvent) {
        match event {
            NativeEvent::KeyDown(key) | NativeEvent::KeyUp(key) => {
                let pressed = matches!(event, NativeEvent::KeyDown(_));
                match key {
                    KeyCode::Shift => self.modifiers.shift = pressed,
                    KeyCode::Ctrl => {
                        self.modifiers.ctrl = pressed;
                        self.modifiers.command = pressed;
                    }
                    KeyCode::Alt => self.modifiers.alt = pressed,
                    _ => {}
                }
                if let Some(key) = keymap::egui_key(key) {
                    self.events.push(egui::Event::Key {
                        key,
                        physical_key: None,
                        pressed,
                        repeat: false,
                        modifiers: self.modifiers,
                    });
                }
            }
            NativeEvent::Text(ch) => self.events.push(egui::Event::Text(ch.to_string())),
            NativeEvent::MouseMove { x, y } => {
                self.pointer = Pos2::new(x as f32, y as f32);
                self.events.push(egui::Event::PointerMoved(self.pointer));
            }
            NativeEvent::MouseDown { button, x, y } | NativeEvent::MouseUp { button, x, y } => {
                let Some(button) = pointer_button(button) else {
                    return;
                };
                self.pointer = Pos2::new(x as f32, y as f32);
                self.events.push(egui::Event::PointerButton {
                    pos: self.pointer,
                    button,
                    pressed: matches!(event, NativeEvent::MouseDown { .. }),
                    modifiers: self.modifiers,
                });
            }
            NativeEvent::Scroll(lines) => self.events.push(egui::Event::MouseWheel {
                unit: egui::MouseWheelUnit::Line,
                delta: Vec2::new(0.0, lines),
                modifiers: self.modifiers,
            }),
            NativeEvent::Resized { .. } => {}
            NativeEvent::CloseRequested => self.events.push(egui::Event::PointerGone),
        }
    }

    /// Builds the UI, paints it into `surface`, and reports input capture.
    pub fn end_frame(&mut self, surface: &mut Surface) -> UiCapture {
        let raw = RawInput {
            screen_rect: Some(Rect::from_min_size(
                Pos2::ZERO,
                Vec2::new(surface.width() as f32, surface.height() as f32),
            )),
            time: Some(self.started.elapsed().as_secs_f64()),
            modifiers: self.modifiers,
            events: std::mem::take(&mut self.events),
            focused: true,
            ..RawInput::default()
        };

        let ctx = self.ctx.clone();
        let mut actions = Vec::new();
        let output = ctx.run(raw, |ctx| actions = self.show(ctx));
        for action in actions {
            self.apply(action);
        }

        self.painter.update_textures(&output.textures_delta);
        let primitives = ctx.tessellate(output.shapes, output.pixels_per_point);
        self.painter.paint(surface, &primitives);
        self.painter.free_textures(&output.textures_delta);

        UiCapture {
            keyboard: ctx.wants_keyboard_input() || self.flow.is_modal(),
            pointer: ctx.wants_pointer_input() || ctx.is_pointer_over_area(),
        }
    }

    pub fn apply(&mut self, action: OverlayAction) {
        match action {
            OverlayAction::Resume => {
                if self.flow.state() == DialogState::PauseMenu {
                    self.flow.toggle_pause_menu();
                }
            }
            OverlayAction::OpenSave => {
                if self.flow.open_save_dialog() {
                    self.save_input = self.flow.draft().to_string();
                    self.save_error = None;
                    self.focus_save_input = true;
                }
            }
            OverlayAction::OpenLoad => {
                self.flow.open_load_dialog();
            }
            OverlayAction::Quit => {
                self.flow.request_quit();
            }
            OverlayAction::SubmitSave => {
                self.save_error = self.flow.submit_save_name(&self.save_input).err();
            }
            OverlayAction::ConfirmOverwrite => {
                self.flow.confirm_overwrite();
            }
            OverlayAction::CancelOverwrite => {
                if self.flow.cancel_overwrite() {
                    self.focus_save_input = true;
                }
            }
            OverlayAction::DismissPostSave => {
                self.flow.dismiss_post_save();
            }
            OverlayAction::SelectLoad(idx) => {
                self.flow.select_load(idx);
            }
            OverlayAction::ConfirmLoad => {
                self.flow.confirm_load();
            }
            OverlayAction::Cancel => {
                self.flow.cancel();
            }
            OverlayAction::SelectCreature(id) => self.selected_creature = Some(id),
            OverlayAction::Recenter(x, y) => {
                tracing::debug!(x, y, "overlay staged viewport recentre");
                self.pending_recenter = Some((x, y));
            }
        }
    }

    fn show(&mut self, ctx: &Context) -> Vec<OverlayAction> {
        let mut actions = Vec::new();

        self.stats_panel(ctx);
        self.details_panel(ctx);
        self.creature_inspector(ctx, &mut actions);
        self.plant_inspector(ctx, &mut actions);

        if self.flow.is_modal() && ctx.input(|i| i.key_pressed(Key::Escape)) {
            actions.push(OverlayAction::Cancel);
            return actions;
        }
        self.dialogs(ctx, &mut actions);
        actions
    }

    fn stats_panel(&self, ctx: &Context) {
        let Some(hud) = &self.hud else {
            return;
        };

        egui::Window::new("Statistics")
            .anchor(Align2::LEFT_TOP, [8.0, 8.0])
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("stats_grid").num_columns(2).show(ui, |ui| {
                    let rows = [
                        ("Date", format!("{} {}", hud.date, hud.time)),
                        ("Population", hud.population.to_string()),
                        ("Births", hud.births.to_string()),
                        ("Food eaten", hud.food_eaten.to_string()),
                        ("Tick rate", format!("{:.1} t/s", hud.tick_rate)),
                        ("View", format!("({}, {})", hud.viewport_x, hud.viewport_y)),
                    ];
                    for (label, value) in rows {
                        ui.label(label);
                        ui.label(value);
                        ui.end_row();
                    }
                });

                ui.separator();
                ui.label(format!("Deaths: {}", hud.deaths.total()));
                for (cause, count) in hud.deaths.breakdown() {
                    ui.label(format!("  {cause}: {count}"));
                }
                if hud.paused {
                    ui.colored_label(Color32::YELLOW, "PAUSED");
                }
            });
    }

    fn details_panel(&self, ctx: &Context) {
        let Some(details) = &self.details else {
            return;
        };

        egui::Window::new("World")
            .anchor(Align2::RIGHT_TOP, [-8.0, 8.0])
            .resizable(false)
            .show(ctx, |ui| {
                for line in details.lines() {
                    ui.monospace(line);
                }
            });
    }

    fn creature_inspector(&self, ctx: &Context, actions: &mut Vec<OverlayAction>) {
        if self.creatures.is_empty() {
            return;
        }

        egui::Window::new("Creatures")
            .default_pos([8.0, 260.0])
            .default_open(false)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("creature_rows")
                    .max_height(180.0)
                    .show(ui, |ui| {
                        for row in &self.creatures {
                            let selected = self.selected_creature == Some(row.id);
                            let text = format!(
                                "{} ({}, {})",
                                row.label, row.position.0, row.position.1
                            );
                            let response = ui.selectable_label(selected, text);
                            if response.double_clicked() {
                                let (x, y) = row.position;
                                actions.push(OverlayAction::Recenter(x, y));
                            } else if response.clicked() {
                                actions.push(OverlayAction::SelectCreature(row.id));
                            }
                        }
                    });

                let selected = self
                    .selected_creature
                    .and_then(|id| self.creatures.iter().find(|row| row.id == id));
                if let Some(row) = selected {
                    ui.separator();
                    ui.label(format!("{} · {} · age {}", row.label, row.diet, row.age));
                    ui.add(egui::ProgressBar::new(row.energy).text("energy"));
                    ui.add(egui::ProgressBar::new(row.hydration).text("hydration"));
                }
            });
    }

    fn plant_inspector(&self, ctx: &Context, actions: &mut Vec<OverlayAction>) {
        if self.plants.is_empty() {
            return;
        }

        egui::Window::new("Plants")
            .default_pos([8.0, 480.0])
            .default_open(false)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("plant_rows")
                    .max_height(160.0)
                    .show(ui, |ui| {
                        for plant in &self.plants {
                            let text = format!(
                                "{} ({}, {})",
                                plant.kind, plant.position.0, plant.position.1
                            );
                            if ui.selectable_label(false, text).double_clicked() {
                                let (x, y) = plant.position;
                                actions.push(OverlayAction::Recenter(x, y));
                            }
                        }
                    });
            });
    }

    fn dialogs(&mut self, ctx: &Context, actions: &mut Vec<OverlayAction>) {
        let modal = |title: &str| {
            egui::Window::new(title.to_string())
                .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                .collapsible(false)
                .resizable(false)
        };

        match self.flow.state() {
            DialogState::Normal => {}
            DialogState::PauseMenu => {
                modal("Paused").show(ctx, |ui| {
                    for (label, action) in [
                        ("Resume", OverlayAction::Resume),
                        ("Save", OverlayAction::OpenSave),
                        ("Load", OverlayAction::OpenLoad),
                        ("Quit", OverlayAction::Quit),
                    ] {
                        if ui.button(label).clicked() {
                            actions.push(action);
                        }
                    }
                });
            }
            DialogState::SaveDialog => {
                let focus = std::mem::take(&mut self.focus_save_input);
                let save_input = &mut self.save_input;
                let error = self.save_error;
                modal("Save").show(ctx, |ui| {
                    ui.label("Save name:");
                    let response = ui.text_edit_singleline(save_input);
                    if focus {
                        response.request_focus();
                    }
                    if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                        actions.push(OverlayAction::SubmitSave);
                    }
                    if error == Some(SaveNameError::Empty) {
                        ui.colored_label(Color32::LIGHT_RED, "Name must not be empty");
                    }
                    ui.horizontal(|ui| {
                        if ui.button("Save").clicked() {
                            actions.push(OverlayAction::SubmitSave);
                        }
                        if ui.button("Cancel").clicked() {
                            actions.push(OverlayAction::Cancel);
                        }
                    });
                });
            }
            DialogState::OverwriteConfirm => {
                let name = self.flow.draft().to_string();
                modal("Overwrite?").show(ctx, |ui| {
                    ui.label(format!("'{name}' already exists. Overwrite it?"));
                    ui.horizontal(|ui| {
                        if ui.button("Overwrite").clicked() {
                            actions.push(OverlayAction::ConfirmOverwrite);
                        }
                        if ui.button("Back").clicked() {
                            actions.push(OverlayAction::CancelOverwrite);
                        }
                    });
                });
            }
            DialogState::PostSaveDialog => {
                let name = self.flow.last_saved().unwrap_or_default().to_string();
                modal("Saved").show(ctx, |ui| {
                    ui.label(format!("Saved as '{name}'."));
                    if ui.button("OK").clicked() {
                        actions.push(OverlayAction::DismissPostSave);
                    }
                });
            }
            DialogState::LoadDialog => {
                let files = self.flow.save_files();
                let selected = self.flow.selected_load();
                modal("Load").show(ctx, |ui| {
                    if files.is_empty() {
                        ui.label("No saves found.");
                    }
                    egui::ScrollArea::vertical()
                        .id_salt("save_files")
                        .max_height(200.0)
                        .show(ui, |ui| {
                            for (idx, file) in files.iter().enumerate() {
                                let text = match &file.modified {
                                    Some(modified) => format!("{}  ({modified})", file.filename),
                                    None => file.filename.clone(),
                                };
                                let response = ui.selectable_label(selected == Some(idx), text);
                                if response.double_clicked() {
                                    actions.push(OverlayAction::SelectLoad(idx));
                                    actions.push(OverlayAction::ConfirmLoad);
                                } else if response.clicked() {
                                    actions.push(OverlayAction::SelectLoad(idx));
                                }
                            }
                        });
                    ui.horizontal(|ui| {
                        if ui
                            .add_enabled(selected.is_some(), egui::Button::new("Load"))
                            .clicked()
                        {
                            actions.push(OverlayAction::ConfirmLoad);
                        }
                        if ui.button("Cancel").clicked() {
                            actions.push(OverlayAction::Cancel);
                        }
                    });
                });
            }
        }
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::None => None,
    }
}

impl OverlayIntents for Overlay {
    fn has_pending_save(&self) -> bool {
        self.flow.has_pending_save()
    }

    fn save_filename(&self) -> Option<&str> {
        self.flow.save_filename()
    }

    fn clear_save_filename(&mut self) {
        self.flow.clear_save_filename();
    }

    fn has_pending_load(&self) -> bool {
        self.flow.has_pending_load()
    }

    fn load_filename(&self) -> Option<&str> {
        self.flow.load_filename()
    }

    fn clear_load_filename(&mut self) {
        self.flow.clear_load_filename();
    }

    fn pending_recenter(&self) -> Option<(i32, i32)> {
        self.pending_recenter
    }

    fn clear_pending_recenter(&mut self) {
        self.pending_recenter = None;
    }

    fn quit_requested(&self) -> bool {
        self.flow.quit_requested()
    }

    fn clear_quit_request(&mut self) {
        self.flow.clear_quit_request();
    }

    fn is_modal(&self) -> bool {
        self.flow.is_modal()
    }

    fn toggle_pause_menu(&mut self) {
        self.flow.toggle_pause_menu();
    }

    fn set_save_files(&mut self, files: Vec<SaveFileInfo>) {
        self.flow.set_save_files(files);
    }

    fn set_file_exists(&mut self, predicate: FileExists) {
        self.flow.set_file_exists(predicate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Grazer;

    impl CreatureView for Grazer {
        fn id(&self) -> u64 {
            9
        }
        fn position(&self) -> (i32, i32) {
            (12, 4)
        }
        fn diet(&self) -> Diet {
            Diet::Herbivore
        }
        fn energy(&self) -> f32 {
            0.5
        }
        fn hydration(&self) -> f32 {
            0.8
        }
        fn age(&self) -> u64 {
            30
        }
    }

    #[test]
    fn hud_snapshot_survives_one_extra_frame() {
        let mut overlay = Overlay::new();
        overlay.record_hud(&HudData::default());

        overlay.begin_frame(Vec::new());
        assert!(overlay.hud().is_some());
        overlay.begin_frame(Vec::new());
        assert!(overlay.hud().is_none());
    }

    #[test]
    fn samples_reset_every_frame() {
        let mut overlay = Overlay::new();
        overlay.record_creature(&Grazer);
        overlay.record_plant((1, 2), PlantKind::Tree);
        assert_eq!(overlay.creatures()[0].position, (12, 4));
        assert_eq!(overlay.plants().len(), 1);

        overlay.begin_frame(Vec::new());
        assert!(overlay.creatures().is_empty());
        assert!(overlay.plants().is_empty());
    }

    #[test]
    fn recenter_is_staged_until_cleared() {
        let mut overlay = Overlay::new();
        overlay.apply(OverlayAction::Recenter(12, 4));
        assert_eq!(overlay.pending_recenter(), Some((12, 4)));
        assert_eq!(overlay.pending_recenter(), Some((12, 4)));
        overlay.clear_pending_recenter();
        assert_eq!(overlay.pending_recenter(), None);
    }

    #[test]
    fn save_actions_drive_the_flow() {
        let mut overlay = Overlay::new();
        overlay.set_file_exists(Box::new(|name: &str| name == "run1"));
        overlay.toggle_pause_menu();
        overlay.apply(OverlayAction::OpenSave);

        overlay.apply(OverlayAction::SubmitSave);
        assert_eq!(overlay.flow().state(), DialogState::SaveDialog);

        overlay.save_input = "run1".to_string();
        overlay.apply(OverlayAction::SubmitSave);
        assert_eq!(overlay.flow().state(), DialogState::OverwriteConfirm);
        overlay.apply(OverlayAction::ConfirmOverwrite);

        assert!(overlay.has_pending_save());
        assert_eq!(overlay.save_filename(), Some("run1"));
        overlay.clear_save_filename();
        assert!(!overlay.has_pending_save());
    }

    #[test]
    fn open_dialog_paints_and_captures_keyboard() {
        let mut overlay = Overlay::new();
        let mut surface = Surface::new(320, 240);

        overlay.begin_frame(Vec::new());
        let idle = overlay.end_frame(&mut surface);
        assert!(!idle.keyboard);

        overlay.toggle_pause_menu();
        // New windows are measured on their first frame and drawn on the next.
        let mut capture = UiCapture::default();
        for _ in 0..2 {
            overlay.begin_frame(Vec::new());
            capture = overlay.end_frame(&mut surface);
        }
        assert!(capture.keyboard);
        assert!(surface.pixels().iter().any(|&p| p != 0));
    }

    #[test]
    fn escape_closes_the_open_dialog() {
        let mut overlay = Overlay::new();
        let mut surface = Surface::new(320, 240);
        overlay.toggle_pause_menu();

        overlay.begin_frame(vec![
            NativeEvent::KeyDown(KeyCode::Escape),
            NativeEvent::KeyUp(KeyCode::Escape),
        ]);
        overlay.end_frame(&mut surface);
        assert_eq!(overlay.flow().state(), DialogState::Normal);
    }
}
