//! Glyph and colour choices for the character grid.
use presentation_core::{CreatureView, Diet, PlantKind, Terrain, TileView};
use ratatui::style::{Color, Modifier, Style};

/// Terminal theme mapping simulation values to glyphs.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalTheme;

impl TerminalTheme {
    pub fn tile(&self, tile: &TileView) -> (char, Style) {
        if tile.food {
            return ('%', Style::default().fg(Color::LightRed));
        }
        if let Some(plant) = tile.plant {
            return self.plant(plant);
        }
        self.terrain(tile.terrain)
    }

    pub fn terrain(&self, terrain: Terrain) -> (char, Style) {
        let (glyph, color) = match terrain {
            Terrain::DeepWater => ('≈', Color::Blue),
            Terrain::ShallowWater => ('~', Color::LightBlue),
            Terrain::Sand => ('.', Color::Yellow),
            Terrain::Grass => ('"', Color::Green),
            Terrain::Forest => ('♣', Color::Green),
            Terrain::Hills => ('n', Color::Gray),
            Terrain::Mountain => ('^', Color::DarkGray),
            Terrain::Snow => ('*', Color::White),
        };
        (glyph, Style::default().fg(color))
    }

    pub fn plant(&self, plant: PlantKind) -> (char, Style) {
        let (glyph, color) = match plant {
            PlantKind::Grass => (',', Color::LightGreen),
            PlantKind::Bush => ('♠', Color::LightGreen),
            PlantKind::Tree => ('T', Color::Green),
            PlantKind::Cactus => ('¥', Color::LightYellow),
        };
        (glyph, Style::default().fg(color))
    }

    pub fn creature(&self, creature: &dyn CreatureView) -> (char, Style) {
        let (glyph, color) = match creature.diet() {
            Diet::Herbivore => ('o', Color::LightCyan),
            Diet::Carnivore => ('X', Color::LightRed),
            Diet::Omnivore => ('&', Color::LightMagenta),
        };

        let mut style = Style::default().fg(color).add_modifier(Modifier::BOLD);
        // Starving or parched creatures fade out
        if creature.energy() < 0.25 || creature.hydration() < 0.25 {
            style = style.remove_modifier(Modifier::BOLD).add_modifier(Modifier::DIM);
        }
        (glyph, style)
    }

    pub fn hud(&self) -> Style {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    }

    pub fn hud_paused(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn menu_selected(&self) -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn menu_disabled(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn message(&self) -> Style {
        Style::default().fg(Color::Yellow)
    }
}
