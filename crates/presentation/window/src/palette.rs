//! Colours for the framebuffer renderer.
use presentation_core::{CreatureView, Diet, PlantKind, Terrain, TileView};

use crate::surface::{rgb, shade};

pub const BACKGROUND: u32 = rgb(12, 12, 16);
pub const HUD_BACKGROUND: u32 = rgb(28, 28, 36);
pub const HUD_TEXT: u32 = rgb(230, 230, 230);
pub const HUD_PAUSED: u32 = rgb(250, 210, 60);
pub const MESSAGE_TEXT: u32 = rgb(255, 255, 255);
pub const MESSAGE_BACKDROP: u32 = rgb(0, 0, 0);
pub const MENU_BACKGROUND: u32 = rgb(20, 24, 34);
pub const MENU_BORDER: u32 = rgb(120, 140, 190);
pub const MENU_SELECTED: u32 = rgb(60, 80, 140);
pub const MENU_TEXT: u32 = rgb(235, 235, 235);
pub const MENU_DISABLED: u32 = rgb(110, 110, 110);
pub const FOOD: u32 = rgb(230, 80, 80);

pub fn terrain(terrain: Terrain) -> u32 {
    match terrain {
        Terrain::DeepWater => rgb(20, 40, 120),
        Terrain::ShallowWater => rgb(50, 100, 180),
        Terrain::Sand => rgb(210, 190, 120),
        Terrain::Grass => rgb(80, 150, 60),
        Terrain::Forest => rgb(40, 100, 40),
        Terrain::Hills => rgb(120, 110, 80),
        Terrain::Mountain => rgb(110, 110, 110),
        Terrain::Snow => rgb(240, 240, 250),
    }
}

/// Terrain colour darkened towards low elevation.
pub fn tile(tile: &TileView) -> u32 {
    shade(terrain(tile.terrain), 0.7 + f32::from(tile.elevation) / 850.0)
}

pub fn plant(plant: PlantKind) -> u32 {
    match plant {
        PlantKind::Grass => rgb(140, 210, 90),
        PlantKind::Bush => rgb(60, 170, 70),
        PlantKind::Tree => rgb(20, 90, 30),
        PlantKind::Cactus => rgb(150, 190, 60),
    }
}

pub fn creature(creature: &dyn CreatureView) -> u32 {
    let base = match creature.diet() {
        Diet::Herbivore => rgb(90, 220, 230),
        Diet::Carnivore => rgb(240, 70, 60),
        Diet::Omnivore => rgb(210, 110, 230),
    };
    if creature.energy() < 0.25 || creature.hydration() < 0.25 {
        shade(base, 0.55)
    } else {
        base
    }
}
