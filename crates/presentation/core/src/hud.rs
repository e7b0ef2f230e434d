//! Per-frame snapshots the simulation hands to the presentation layer.

/// Death counters broken down by cause.
///
/// Counters are independent and never decrease over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeathStats {
    pub old_age: u64,
    pub starved: u64,
    pub dehydrated: u64,
    pub discomfort: u64,
    pub predator: u64,
}

impl DeathStats {
    pub fn total(&self) -> u64 {
        self.old_age + self.starved + self.dehydrated + self.discomfort + self.predator
    }

    /// `(label, count)` pairs in display order.
    pub fn breakdown(&self) -> [(&'static str, u64); 5] {
        [
            ("Old age", self.old_age),
            ("Starved", self.starved),
            ("Dehydrated", self.dehydrated),
            ("Discomfort", self.discomfort),
            ("Predator", self.predator),
        ]
    }
}

/// Immutable HUD snapshot for one frame.
///
/// This is the only route simulation state takes into the HUD.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HudData {
    pub population: u32,
    pub births: u64,
    pub food_eaten: u64,
    pub deaths: DeathStats,
    pub time: String,
    pub date: String,
    pub world_width: u32,
    pub world_height: u32,
    pub viewport_x: i32,
    pub viewport_y: i32,
    /// Simulation ticks per second.
    pub tick_rate: f32,
    pub paused: bool,
}

impl HudData {
    /// Single-line status summary used by narrow HUDs.
    pub fn status_line(&self) -> String {
        format!(
            "{} {} | pop {} | births {} | food {} | deaths {} | {:.1} t/s{}",
            self.date,
            self.time,
            self.population,
            self.births,
            self.food_eaten,
            self.deaths.total(),
            self.tick_rate,
            if self.paused { " | PAUSED" } else { "" }
        )
    }
}

/// World-generator parameters shown by `render_world_details`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldDetails {
    pub seed: u64,
    pub scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub frequency: f32,
    /// Terrain level `1..=9` currently selected for editing.
    pub terrain_level: u8,
    pub world_width: u32,
    pub world_height: u32,
}

impl WorldDetails {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Seed:        {}", self.seed),
            format!("Size:        {}x{}", self.world_width, self.world_height),
            format!("Scale:       {:.2}", self.scale),
            format!("Octaves:     {}", self.octaves),
            format!("Persistence: {:.2}", self.persistence),
            format!("Lacunarity:  {:.2}", self.lacunarity),
            format!("Frequency:   {:.3}", self.frequency),
            format!("Terrain lvl: {}", self.terrain_level),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn death_total_sums_every_cause() {
        let deaths = DeathStats {
            old_age: 1,
            starved: 2,
            dehydrated: 3,
            discomfort: 4,
            predator: 5,
        };
        assert_eq!(deaths.total(), 15);
        assert_eq!(deaths.breakdown()[4], ("Predator", 5));
    }

    #[test]
    fn status_line_marks_pause() {
        let hud = HudData {
            paused: true,
            population: 7,
            ..HudData::default()
        };
        let line = hud.status_line();
        assert!(line.contains("pop 7"));
        assert!(line.ends_with("PAUSED"));
    }
}
